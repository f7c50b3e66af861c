// crates/dualid-core/src/json/tree.rs
// ============================================================================
// Module: Value Tree Codec
// Description: JSON codec operating on serde_json::Value trees.
// Purpose: Provide a second, independent encoding path for identifiers.
// Dependencies: serde_json, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`ValueTreeCodec`] builds `serde_json::Value` nodes by hand and matches
//! on parsed trees. It shares no code with the streaming serde impls, which
//! is what makes the byte-parity checks between the two codecs meaningful.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Number;
use serde_json::Value;

use crate::core::Identifier;
use crate::core::IdentifierValue;
use crate::interfaces::JsonCodec;
use crate::interfaces::JsonCodecError;
use crate::json::ID_FIELD;

// ============================================================================
// SECTION: Codec
// ============================================================================

/// JSON codec built on `serde_json::Value` trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueTreeCodec;

impl ValueTreeCodec {
    /// Converts an optional identifier into a JSON tree node.
    #[must_use]
    pub fn to_value(id: Option<&Identifier>) -> Value {
        match id.map(Identifier::value) {
            None => Value::Null,
            Some(IdentifierValue::Integer(value)) => Value::String(value.to_string()),
            Some(IdentifierValue::Text(text)) => Value::String(text.clone()),
        }
    }

    /// Reads an optional identifier from a JSON tree node.
    ///
    /// # Errors
    ///
    /// Returns [`JsonCodecError::Shape`] for unsupported node types.
    pub fn from_value(value: &Value) -> Result<Option<Identifier>, JsonCodecError> {
        match value {
            Value::Object(fields) => fields.get(ID_FIELD).map_or(Ok(None), scalar_from_value),
            other => scalar_from_value(other),
        }
    }
}

impl JsonCodec for ValueTreeCodec {
    fn name(&self) -> &'static str {
        "value-tree"
    }

    fn encode(&self, id: Option<&Identifier>) -> Result<String, JsonCodecError> {
        serde_json::to_string(&Self::to_value(id))
            .map_err(|err| JsonCodecError::Encode(err.to_string()))
    }

    fn decode(&self, json: &str) -> Result<Option<Identifier>, JsonCodecError> {
        let value: Value =
            serde_json::from_str(json).map_err(|err| JsonCodecError::Syntax(err.to_string()))?;
        Self::from_value(&value)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a scalar node: `null`, string, or integer.
fn scalar_from_value(value: &Value) -> Result<Option<Identifier>, JsonCodecError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Identifier::from_canonical(text).ok()),
        Value::Number(number) => integer_from_number(number).map(Some),
        Value::Bool(_) => Err(shape_error("boolean")),
        Value::Array(_) => Err(shape_error("array")),
        Value::Object(_) => Err(shape_error("nested object")),
    }
}

/// Accepts JSON numbers that fit in an `i64`.
fn integer_from_number(number: &Number) -> Result<Identifier, JsonCodecError> {
    number
        .as_i64()
        .map(Identifier::of_integer)
        .ok_or_else(|| shape_error(&format!("number {number}")))
}

/// Builds a shape error for an unsupported node.
fn shape_error(found: &str) -> JsonCodecError {
    JsonCodecError::Shape(format!("expected identifier string, integer, or null; found {found}"))
}
