// crates/dualid-core/src/core/mod.rs
// ============================================================================
// Module: dualid Core Types
// Description: Identifier value type, configuration, and error taxonomy.
// Purpose: Provide the canonical, immutable identifier model.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types are the single source of truth for identifier semantics. The
//! codecs and the generator build on these types and never redefine
//! equality or the canonical string form.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod config;
pub mod error;
pub mod identifier;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::EqualityMode;
pub use config::IdentifierConfig;
pub use error::IdentifierError;
pub use identifier::Identifier;
pub use identifier::IdentifierKey;
pub use identifier::IdentifierKind;
pub use identifier::IdentifierValue;
