// crates/dualid-core/src/json/serde_impl.rs
// ============================================================================
// Module: Streaming Serde Codec
// Description: serde Serialize/Deserialize impls and the serde_json codec.
// Purpose: Encode identifiers as bare strings through the serde data model.
// Dependencies: serde, serde_json, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`Identifier`] serializes through `collect_str`, so every serde format
//! sees its canonical string form. Deserialization uses `deserialize_any`
//! and therefore targets self-describing formats such as JSON.
//!
//! Use [`optional`] with `#[serde(with = "...", default)]` on
//! `Option<Identifier>` fields to get the `null` / empty / missing-`id`
//! to `None` rules.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::DeserializeSeed;
use serde::de::Error as _;
use serde::de::IgnoredAny;
use serde::de::MapAccess;
use serde::de::SeqAccess;
use serde::de::Unexpected;
use serde::de::Visitor;
use serde_json::error::Category;

use crate::core::Identifier;
use crate::interfaces::JsonCodec;
use crate::interfaces::JsonCodecError;
use crate::json::ID_FIELD;

// ============================================================================
// SECTION: Serde Impls
// ============================================================================

impl Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        optional::deserialize(deserializer)?
            .ok_or_else(|| D::Error::custom("identifier must not be null or empty"))
    }
}

/// `#[serde(with = "...")]` helpers for `Option<Identifier>` fields.
pub mod optional {
    use serde::Deserializer;
    use serde::Serialize;
    use serde::Serializer;

    use super::IdentifierVisitor;
    use crate::core::Identifier;

    /// Serializes `None` as `null` and identifiers as bare strings.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error type on output failure.
    #[allow(clippy::ref_option, reason = "Signature is fixed by serde's `with` attribute.")]
    pub fn serialize<S>(value: &Option<Identifier>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(id) => id.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes `null`, strings, integers, or `{ "id": ... }` objects.
    ///
    /// # Errors
    ///
    /// Returns the deserializer's error type for unsupported shapes.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Identifier>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IdentifierVisitor)
    }
}

// ============================================================================
// SECTION: Visitors
// ============================================================================

/// Visitor for the top-level identifier shapes.
struct IdentifierVisitor;

impl<'de> Visitor<'de> for IdentifierVisitor {
    type Value = Option<Identifier>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an identifier string, integer, null, or an object with an `id`")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(None)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Identifier::from_canonical(value).ok())
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        self.visit_str(&value)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Some(Identifier::of_integer(value)))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        i64::try_from(value)
            .map(|value| Some(Identifier::of_integer(value)))
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut found = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == ID_FIELD {
                found = Some(map.next_value_seed(FieldValue)?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        match found {
            None => Ok(None),
            Some(FieldShape::Scalar(id)) => Ok(id),
            Some(FieldShape::Unsupported(unexpected)) => Err(A::Error::invalid_type(
                unexpected.as_unexpected(),
                &"an identifier string, integer, or null",
            )),
        }
    }
}

/// Shape of an `id` field value. Unsupported shapes are recorded rather
/// than raised so that a later duplicate `id` key wins, as it does for
/// `serde_json::Value` maps.
enum FieldShape {
    /// A supported scalar, already decoded.
    Scalar(Option<Identifier>),
    /// An unsupported value.
    Unsupported(UnsupportedValue),
}

/// Owned description of an unsupported `id` value.
#[derive(Clone, Copy)]
enum UnsupportedValue {
    /// Boolean literal.
    Bool(bool),
    /// Out-of-range unsigned integer.
    Unsigned(u64),
    /// Floating-point number.
    Float(f64),
    /// Array.
    Seq,
    /// Object.
    Map,
}

impl UnsupportedValue {
    /// Converts to serde's error description.
    const fn as_unexpected(self) -> Unexpected<'static> {
        match self {
            Self::Bool(value) => Unexpected::Bool(value),
            Self::Unsigned(value) => Unexpected::Unsigned(value),
            Self::Float(value) => Unexpected::Float(value),
            Self::Seq => Unexpected::Seq,
            Self::Map => Unexpected::Map,
        }
    }
}

/// Seed reading the value of an `id` field.
struct FieldValue;

impl<'de> DeserializeSeed<'de> for FieldValue {
    type Value = FieldShape;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for FieldValue {
    type Value = FieldShape;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any JSON value")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(FieldShape::Scalar(None))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(FieldShape::Scalar(None))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        IdentifierVisitor.visit_str(value).map(FieldShape::Scalar)
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        self.visit_str(&value)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(FieldShape::Scalar(Some(Identifier::of_integer(value))))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(i64::try_from(value).map_or(
            FieldShape::Unsupported(UnsupportedValue::Unsigned(value)),
            |value| FieldShape::Scalar(Some(Identifier::of_integer(value))),
        ))
    }

    fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(FieldShape::Unsupported(UnsupportedValue::Bool(value)))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(FieldShape::Unsupported(UnsupportedValue::Float(value)))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(FieldShape::Unsupported(UnsupportedValue::Seq))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(FieldShape::Unsupported(UnsupportedValue::Map))
    }
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// JSON codec driven by the streaming serde impls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonCodec;

impl JsonCodec for SerdeJsonCodec {
    fn name(&self) -> &'static str {
        "serde"
    }

    fn encode(&self, id: Option<&Identifier>) -> Result<String, JsonCodecError> {
        serde_json::to_string(&id).map_err(|err| JsonCodecError::Encode(err.to_string()))
    }

    fn decode(&self, json: &str) -> Result<Option<Identifier>, JsonCodecError> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let decoded = optional::deserialize(&mut deserializer).map_err(classify)?;
        deserializer.end().map_err(classify)?;
        Ok(decoded)
    }
}

/// Maps `serde_json` failures onto codec error categories.
fn classify(err: serde_json::Error) -> JsonCodecError {
    match err.classify() {
        Category::Data => JsonCodecError::Shape(err.to_string()),
        Category::Io | Category::Syntax | Category::Eof => JsonCodecError::Syntax(err.to_string()),
    }
}
