// crates/dualid-store-sqlite/src/codec.rs
// ============================================================================
// Module: Identifier Column Codec
// Description: Conversion between identifiers and SQLite column values.
// Purpose: Write identifiers in the configured column layout and read any
//          legacy value back without failing.
// Dependencies: dualid-core, rusqlite, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! The codec is built once from an [`IdentifierConfig`] and an
//! [`IdentifierColumnConfig`]. Construction resolves the column definition,
//! so unsupported dialects and zero string lengths fail before any row is
//! touched.
//!
//! Writes follow the column layout: native integer columns receive
//! `INTEGER` values for integer identifiers, everything else is stored as
//! text. Reads are permissive. Any stored value maps to an identifier, or
//! to `None` for `NULL` and empty strings.
//!
//! `SQLite` applies numeric affinity to `BIGINT` columns, and integer-looking
//! text always decodes as the integer kind. [`StorageEncoding::Tagged`]
//! prefixes such text payloads with [`TAG_MARKER`] so they survive the
//! round trip as text. It is the encoding used unless the config asks for
//! [`StorageEncoding::Canonical`], which is only accepted for `VARCHAR`
//! columns under canonical equality with auto-conversion on.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;

use dualid_core::ColumnKind;
use dualid_core::ColumnTypeResolver;
use dualid_core::DefaultColumnTypeResolver;
use dualid_core::EqualityMode;
use dualid_core::Identifier;
use dualid_core::IdentifierConfig;
use dualid_core::IdentifierError;
use dualid_core::IdentifierKind;
use dualid_core::IdentifierValue;
use dualid_core::runtime::DEFAULT_STRING_COLUMN_LENGTH;
use rusqlite::Row;
use rusqlite::types::Value;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix marking a text payload under [`StorageEncoding::Tagged`].
pub const TAG_MARKER: char = '~';

/// Dialect assumed when none is configured.
const DEFAULT_DIALECT: &str = "sqlite";

// ============================================================================
// SECTION: Config
// ============================================================================

/// Text form used for identifiers stored in text columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageEncoding {
    /// The canonical string with no markers. Integer-looking text decodes
    /// as an integer, so only identifiers built under auto-conversion read
    /// back equal.
    Canonical,
    /// Canonical string, with [`TAG_MARKER`] before text payloads that
    /// look numeric or already start with the marker.
    Tagged,
}

impl StorageEncoding {
    /// Returns the stable label used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::Tagged => "tagged",
        }
    }

    /// Checks that this encoding round-trips identifiers for the given
    /// config and column type.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Invalid`] when [`Self::Canonical`] is combined
    /// with disabled auto-conversion, strict equality, or a `BIGINT` column.
    pub fn check(
        self,
        config: &IdentifierConfig,
        column_kind: ColumnKind,
    ) -> Result<(), CodecError> {
        if matches!(self, Self::Tagged) {
            return Ok(());
        }
        let conflict = if !config.auto_convert_text_to_integer {
            Some(
                "canonical encoding requires auto_convert_text_to_integer; integer-looking text \
                 would read back as an integer",
            )
        } else if matches!(config.equality_mode, EqualityMode::Strict) {
            Some(
                "canonical encoding requires canonical equality; integer-looking text would not \
                 read back strictly equal",
            )
        } else if matches!(column_kind, ColumnKind::BigInt) {
            Some(
                "canonical encoding requires a VARCHAR column; BIGINT affinity rewrites \
                 numeric-looking text such as 1e5",
            )
        } else {
            None
        };
        conflict.map_or(Ok(()), |message| Err(CodecError::Invalid(message.to_string())))
    }
}

/// Column layout for identifier columns.
///
/// # Invariants
/// - `string_column_length` must be greater than zero.
/// - `database_dialect` must name a supported dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentifierColumnConfig {
    /// Use `BIGINT` for integer-default columns instead of always `VARCHAR`.
    #[serde(default = "default_use_native_column_types")]
    pub use_native_column_types: bool,
    /// Length of `VARCHAR` identifier columns.
    #[serde(default = "default_string_column_length")]
    pub string_column_length: u32,
    /// Target SQL dialect for column definitions.
    #[serde(default = "default_database_dialect")]
    pub database_dialect: String,
    /// Explicit text encoding. Tagged when unset.
    #[serde(default)]
    pub encoding: Option<StorageEncoding>,
}

impl Default for IdentifierColumnConfig {
    fn default() -> Self {
        Self {
            use_native_column_types: default_use_native_column_types(),
            string_column_length: default_string_column_length(),
            database_dialect: default_database_dialect(),
            encoding: None,
        }
    }
}

/// Native column types are used by default.
const fn default_use_native_column_types() -> bool {
    true
}

/// Default `VARCHAR` length.
const fn default_string_column_length() -> u32 {
    DEFAULT_STRING_COLUMN_LENGTH
}

/// Default dialect label.
fn default_database_dialect() -> String {
    DEFAULT_DIALECT.to_string()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while constructing a codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Column resolution rejected the configuration.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
    /// Configuration combination cannot round-trip identifiers.
    #[error("invalid identifier column config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Converts identifiers to and from `SQLite` values for one column layout.
#[derive(Debug, Clone)]
pub struct IdentifierColumnCodec {
    /// Identifier semantics.
    identifier: IdentifierConfig,
    /// Column layout.
    column: IdentifierColumnConfig,
    /// Effective text encoding.
    encoding: StorageEncoding,
    /// Declared column type.
    column_kind: ColumnKind,
    /// Resolved DDL type.
    column_definition: String,
}

impl IdentifierColumnCodec {
    /// Builds a codec, resolving the column definition up front.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Identifier`] for unsupported dialects or a zero
    /// string length, and [`CodecError::Invalid`] when the canonical
    /// encoding cannot round-trip identifiers for this layout.
    pub fn new(
        identifier: IdentifierConfig,
        column: IdentifierColumnConfig,
    ) -> Result<Self, CodecError> {
        let resolver = DefaultColumnTypeResolver;
        let declared = declared_kind(&identifier, &column);
        let column_kind = resolver.resolve_column_kind(declared);
        let column_definition = resolver.column_definition(
            declared,
            &column.database_dialect,
            column.string_column_length,
        )?;
        let encoding = column.encoding.unwrap_or(StorageEncoding::Tagged);
        encoding.check(&identifier, column_kind)?;
        tracing::debug!(
            column_definition = %column_definition,
            encoding = encoding.as_str(),
            "identifier column codec ready"
        );
        Ok(Self {
            identifier,
            column,
            encoding,
            column_kind,
            column_definition,
        })
    }

    /// Returns the identifier config.
    #[must_use]
    pub const fn identifier_config(&self) -> &IdentifierConfig {
        &self.identifier
    }

    /// Returns the column layout.
    #[must_use]
    pub const fn column_config(&self) -> &IdentifierColumnConfig {
        &self.column
    }

    /// Returns the effective text encoding.
    #[must_use]
    pub const fn encoding(&self) -> StorageEncoding {
        self.encoding
    }

    /// Returns the declared column type.
    #[must_use]
    pub const fn column_kind(&self) -> ColumnKind {
        self.column_kind
    }

    /// Returns the resolved DDL column type, e.g. `BIGINT` or `VARCHAR(255)`.
    #[must_use]
    pub fn column_definition(&self) -> &str {
        &self.column_definition
    }

    /// Converts an identifier to the value bound for its column.
    #[must_use]
    pub fn write(&self, id: Option<&Identifier>) -> Value {
        let Some(id) = id else {
            return Value::Null;
        };
        match (self.column_kind, id.value()) {
            (ColumnKind::BigInt, IdentifierValue::Integer(value)) => Value::Integer(*value),
            _ => Value::Text(self.encode_text(id).into_owned()),
        }
    }

    /// Converts a stored value back to an identifier. Never fails.
    #[must_use]
    pub fn read(&self, value: ValueRef<'_>) -> Option<Identifier> {
        match value {
            ValueRef::Null => None,
            ValueRef::Integer(value) => Some(Identifier::of_integer(value)),
            ValueRef::Real(value) => {
                tracing::debug!(value, "reading real identifier value");
                self.decode_text(&value.to_string())
            }
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                self.decode_text(&String::from_utf8_lossy(bytes))
            }
        }
    }

    /// Reads the identifier at `index` of `row`.
    ///
    /// # Errors
    ///
    /// Returns [`rusqlite::Error`] when the column index is out of range.
    pub fn read_column(&self, row: &Row<'_>, index: usize) -> rusqlite::Result<Option<Identifier>> {
        row.get_ref(index).map(|value| self.read(value))
    }

    /// Returns the text form cached for an identifier.
    #[must_use]
    pub fn disassemble(&self, id: Option<&Identifier>) -> Option<String> {
        id.map(|id| self.encode_text(id).into_owned())
    }

    /// Rebuilds an identifier from its cached text form.
    #[must_use]
    pub fn assemble(&self, cached: Option<&str>) -> Option<Identifier> {
        cached.and_then(|text| self.decode_text(text))
    }

    /// Compares identifiers under the configured equality mode.
    #[must_use]
    pub fn equals(&self, left: &Identifier, right: &Identifier) -> bool {
        left.equals(right, &self.identifier)
    }

    /// Hashes an identifier consistently with [`Self::equals`].
    #[must_use]
    pub fn hash(&self, id: &Identifier) -> u64 {
        id.hash_with(&self.identifier)
    }

    /// Renders the stored text form for an identifier.
    fn encode_text<'a>(&self, id: &'a Identifier) -> Cow<'a, str> {
        match id.as_text() {
            Some(text) if self.encoding == StorageEncoding::Tagged && needs_tag(text) => {
                Cow::Owned(format!("{TAG_MARKER}{text}"))
            }
            Some(text) => Cow::Borrowed(text),
            None => Cow::Owned(id.as_string()),
        }
    }

    /// Decodes a stored text form. Empty text maps to `None`.
    fn decode_text(&self, text: &str) -> Option<Identifier> {
        if self.encoding == StorageEncoding::Tagged
            && let Some(payload) = text.strip_prefix(TAG_MARKER)
            && !payload.is_empty()
        {
            return Identifier::of_text_verbatim(payload).ok();
        }
        let id = Identifier::from_canonical(text).ok()?;
        if self.column_kind == ColumnKind::BigInt && id.is_text() {
            tracing::debug!(stored = text, "text value in integer identifier column");
        }
        Some(id)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Kind that determines the declared column type.
const fn declared_kind(
    identifier: &IdentifierConfig,
    column: &IdentifierColumnConfig,
) -> IdentifierKind {
    if column.use_native_column_types { identifier.default_kind } else { IdentifierKind::Text }
}

/// True when a text payload must carry the tag to read back as text.
///
/// Covers integer-looking text and anything `SQLite` numeric affinity
/// might coerce, such as `1e5` or ` 12`.
fn needs_tag(text: &str) -> bool {
    if text.starts_with(TAG_MARKER) {
        return true;
    }
    let trimmed = text.trim();
    !trimmed.is_empty() && (trimmed.parse::<i64>().is_ok() || trimmed.parse::<f64>().is_ok())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
