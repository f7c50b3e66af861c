// crates/dualid-core/src/core/identifier.rs
// ============================================================================
// Module: dualid Identifier
// Description: Dual-kind identifier holding an integer or a non-empty string.
// Purpose: Provide an immutable key with configuration-aware equality.
// Dependencies: serde, crate::core::{config, error}
// ============================================================================

//! ## Overview
//! An [`Identifier`] holds exactly one payload: a signed 64-bit integer or a
//! non-empty string. The canonical string form (decimal for integers, raw
//! text otherwise) is the single representation used for canonical
//! equality, hashing, JSON, and cache keys.
//!
//! The derived `PartialEq`, `Eq`, and `Hash` impls are strict: they compare
//! kind and value. Configuration-aware comparison goes through
//! [`Identifier::equals`], [`Identifier::hash_with`], or [`IdentifierKey`].
//!
//! Auto-conversion is applied at construction and is lossy: `"007"` becomes
//! the integer `7`, so its canonical form is `"7"`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::fmt;
use std::hash::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::core::config::EqualityMode;
use crate::core::config::IdentifierConfig;
use crate::core::error::IdentifierError;

// ============================================================================
// SECTION: Kind
// ============================================================================

/// Tag describing which payload an identifier holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// Signed 64-bit integer payload.
    #[default]
    #[serde(alias = "long", alias = "LONG", alias = "INTEGER")]
    Integer,
    /// Non-empty string payload.
    #[serde(alias = "string", alias = "STRING", alias = "TEXT")]
    Text,
}

impl IdentifierKind {
    /// Returns the stable lowercase label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierKind {
    type Err = IdentifierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::InvalidArgument(
                "identifier kind must be non-empty".to_string(),
            ));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "integer" | "long" => Ok(Self::Integer),
            "text" | "string" => Ok(Self::Text),
            _ => Err(IdentifierError::InvalidArgument(format!(
                "unrecognized identifier kind: {trimmed}"
            ))),
        }
    }
}

// ============================================================================
// SECTION: Identifier
// ============================================================================

/// Payload of an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentifierValue {
    /// Integer payload.
    Integer(i64),
    /// Non-empty text payload.
    Text(String),
}

/// Immutable identifier holding either an integer or a non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    /// Payload; text is guaranteed non-empty by every constructor.
    value: IdentifierValue,
}

impl Identifier {
    /// Creates an integer identifier.
    #[must_use]
    pub const fn of_integer(value: i64) -> Self {
        Self {
            value: IdentifierValue::Integer(value),
        }
    }

    /// Creates a text identifier, promoting integer-looking text to the
    /// integer kind when `config.auto_convert_text_to_integer` is set.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidArgument`] when `value` is empty.
    pub fn of_text(
        value: impl Into<String>,
        config: &IdentifierConfig,
    ) -> Result<Self, IdentifierError> {
        let value = non_empty(value.into())?;
        if config.auto_convert_text_to_integer
            && let Some(parsed) = parse_integer(&value)
        {
            return Ok(Self::of_integer(parsed));
        }
        Ok(Self::text_unchecked(value))
    }

    /// Creates an identifier guided by the configured default kind.
    ///
    /// With an integer default the text is parsed when possible and kept as
    /// text otherwise. With a text default the input is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidArgument`] when `value` is empty.
    pub fn of_default_kind(
        value: impl Into<String>,
        config: &IdentifierConfig,
    ) -> Result<Self, IdentifierError> {
        let value = non_empty(value.into())?;
        match config.default_kind {
            IdentifierKind::Integer => Ok(Self::from_canonical_owned(value)),
            IdentifierKind::Text => Ok(Self::text_unchecked(value)),
        }
    }

    /// Rebuilds an identifier from its canonical string form: integer first,
    /// text otherwise. Used by decoders reading wire or stored values.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidArgument`] when `value` is empty.
    pub fn from_canonical(value: &str) -> Result<Self, IdentifierError> {
        if value.is_empty() {
            return Err(empty_text_error());
        }
        Ok(parse_integer(value)
            .map_or_else(|| Self::text_unchecked(value.to_string()), Self::of_integer))
    }

    /// Creates a text identifier without auto-conversion.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidArgument`] when `value` is empty.
    pub fn of_text_verbatim(value: impl Into<String>) -> Result<Self, IdentifierError> {
        non_empty(value.into()).map(Self::text_unchecked)
    }

    /// Returns the identifier kind.
    #[must_use]
    pub const fn kind(&self) -> IdentifierKind {
        match self.value {
            IdentifierValue::Integer(_) => IdentifierKind::Integer,
            IdentifierValue::Text(_) => IdentifierKind::Text,
        }
    }

    /// Returns the payload.
    #[must_use]
    pub const fn value(&self) -> &IdentifierValue {
        &self.value
    }

    /// Returns true for the integer kind.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self.value, IdentifierValue::Integer(_))
    }

    /// Returns true for the text kind.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.value, IdentifierValue::Text(_))
    }

    /// Returns the text payload for text identifiers.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            IdentifierValue::Integer(_) => None,
            IdentifierValue::Text(text) => Some(text),
        }
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_string(&self) -> String {
        self.canonical().into_owned()
    }

    /// Returns the integer value, parsing text identifiers as base-10.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Parse`] when text content is not an integer.
    pub fn as_integer(&self) -> Result<i64, IdentifierError> {
        match &self.value {
            IdentifierValue::Integer(value) => Ok(*value),
            IdentifierValue::Text(text) => parse_integer(text).ok_or_else(|| {
                IdentifierError::Parse(format!("identifier {text} is not a valid integer"))
            }),
        }
    }

    /// Compares two identifiers under the configured equality mode.
    #[must_use]
    pub fn equals(&self, other: &Self, config: &IdentifierConfig) -> bool {
        self.equals_in(other, config.equality_mode)
    }

    /// Compares two identifiers under an explicit equality mode.
    #[must_use]
    pub fn equals_in(&self, other: &Self, mode: EqualityMode) -> bool {
        match mode {
            EqualityMode::Strict => self == other,
            EqualityMode::Canonical => match (&self.value, &other.value) {
                (IdentifierValue::Integer(left), IdentifierValue::Integer(right)) => left == right,
                (IdentifierValue::Text(left), IdentifierValue::Text(right)) => left == right,
                _ => self.canonical() == other.canonical(),
            },
        }
    }

    /// Hashes the identifier consistently with [`Identifier::equals`].
    #[must_use]
    pub fn hash_with(&self, config: &IdentifierConfig) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash_in(config.equality_mode, &mut hasher);
        hasher.finish()
    }

    /// Wraps the identifier in a key whose `Eq`/`Hash` follow `mode`.
    #[must_use]
    pub const fn keyed(self, mode: EqualityMode) -> IdentifierKey {
        IdentifierKey {
            id: self,
            mode,
        }
    }

    /// Feeds the mode-specific hash input into `state`.
    fn hash_in<H: Hasher>(&self, mode: EqualityMode, state: &mut H) {
        match mode {
            EqualityMode::Canonical => self.canonical().as_ref().hash(state),
            EqualityMode::Strict => self.hash(state),
        }
    }

    /// Returns the canonical form, borrowing text payloads.
    fn canonical(&self) -> Cow<'_, str> {
        match &self.value {
            IdentifierValue::Integer(value) => Cow::Owned(value.to_string()),
            IdentifierValue::Text(text) => Cow::Borrowed(text),
        }
    }

    /// Integer-first parse of an owned, already non-empty string.
    fn from_canonical_owned(value: String) -> Self {
        parse_integer(&value).map_or_else(|| Self::text_unchecked(value), Self::of_integer)
    }

    /// Wraps text that the caller has already checked is non-empty.
    const fn text_unchecked(value: String) -> Self {
        Self {
            value: IdentifierValue::Text(value),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            IdentifierValue::Integer(value) => value.fmt(f),
            IdentifierValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Self::of_integer(value)
    }
}

// ============================================================================
// SECTION: Keyed Identifier
// ============================================================================

/// Identifier paired with an equality mode for hash-based collections.
///
/// Keys stored in one collection must share a mode; comparison uses the
/// left-hand key's mode.
#[derive(Debug, Clone)]
pub struct IdentifierKey {
    /// Wrapped identifier.
    id: Identifier,
    /// Equality rule for `Eq` and `Hash`.
    mode: EqualityMode,
}

impl IdentifierKey {
    /// Returns the wrapped identifier.
    #[must_use]
    pub const fn id(&self) -> &Identifier {
        &self.id
    }

    /// Returns the equality mode.
    #[must_use]
    pub const fn mode(&self) -> EqualityMode {
        self.mode
    }

    /// Unwraps the identifier.
    #[must_use]
    pub fn into_inner(self) -> Identifier {
        self.id
    }
}

impl PartialEq for IdentifierKey {
    fn eq(&self, other: &Self) -> bool {
        self.id.equals_in(&other.id, self.mode)
    }
}

impl Eq for IdentifierKey {}

impl Hash for IdentifierKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash_in(self.mode, state);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a base-10 signed integer with no surrounding noise.
pub(crate) fn parse_integer(value: &str) -> Option<i64> {
    value.parse::<i64>().ok()
}

/// Rejects empty text payloads.
fn non_empty(value: String) -> Result<String, IdentifierError> {
    if value.is_empty() { Err(empty_text_error()) } else { Ok(value) }
}

/// Error returned for empty text input.
fn empty_text_error() -> IdentifierError {
    IdentifierError::InvalidArgument("identifier text must be non-empty".to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
