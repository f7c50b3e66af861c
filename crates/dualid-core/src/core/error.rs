// crates/dualid-core/src/core/error.rs
// ============================================================================
// Module: Identifier Errors
// Description: Error taxonomy for identifier construction and resolution.
// Purpose: Surface invalid inputs synchronously to the immediate caller.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Construction and configuration-resolution failures are reported through
//! [`IdentifierError`]. None of these errors are retried by this crate.

use thiserror::Error;

/// Errors raised while constructing, converting, or mapping identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// A required input was empty or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Text content could not be read as a base-10 integer.
    #[error("identifier parse error: {0}")]
    Parse(String),
    /// The database dialect is outside the supported set.
    #[error("unsupported database dialect: {0}")]
    UnsupportedDialect(String),
    /// The in-process integer sequence reached `i64::MAX`.
    #[error("identifier sequence exhausted")]
    SequenceExhausted,
}
