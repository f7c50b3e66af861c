// crates/dualid-core/src/interfaces/mod.rs
// ============================================================================
// Module: dualid Interfaces
// Description: Contract surfaces for column type resolution and JSON codecs.
// Purpose: Let storage and wire layers plug in without redefining semantics.
// Dependencies: crate::core, crate::runtime, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how identifiers meet external representations. Each
//! implementation must honor the canonical string form defined by
//! [`Identifier`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::Identifier;
use crate::core::IdentifierError;
use crate::core::IdentifierKind;
use crate::runtime::ColumnKind;

// ============================================================================
// SECTION: Column Type Resolution
// ============================================================================

/// Maps identifier kinds to physical column types per database dialect.
pub trait ColumnTypeResolver {
    /// Returns the logical column type for a kind.
    fn resolve_column_kind(&self, kind: IdentifierKind) -> ColumnKind;

    /// Returns the column definition for a kind in the named dialect.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidArgument`] for an empty dialect or a
    /// zero string length, and [`IdentifierError::UnsupportedDialect`] for
    /// dialects outside the supported set.
    fn column_definition(
        &self,
        kind: IdentifierKind,
        dialect: &str,
        string_length: u32,
    ) -> Result<String, IdentifierError>;
}

// ============================================================================
// SECTION: JSON Codecs
// ============================================================================

/// JSON codec errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonCodecError {
    /// Input was not well-formed JSON.
    #[error("identifier json syntax error: {0}")]
    Syntax(String),
    /// Input was JSON but not an accepted identifier shape.
    #[error("identifier json shape error: {0}")]
    Shape(String),
    /// Output could not be produced.
    #[error("identifier json encode error: {0}")]
    Encode(String),
}

/// Converts identifiers to and from their JSON wire form.
///
/// Implementations must produce byte-identical output for the same input
/// and decode each other's output to strictly equal identifiers.
pub trait JsonCodec {
    /// Returns a short label for diagnostics.
    fn name(&self) -> &'static str;

    /// Encodes an optional identifier as a bare JSON string or `null`.
    ///
    /// # Errors
    ///
    /// Returns [`JsonCodecError::Encode`] when output cannot be produced.
    fn encode(&self, id: Option<&Identifier>) -> Result<String, JsonCodecError>;

    /// Decodes JSON text into an optional identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JsonCodecError`] for malformed JSON or unsupported shapes.
    fn decode(&self, json: &str) -> Result<Option<Identifier>, JsonCodecError>;
}
