// crates/dualid-core/src/runtime/mod.rs
// ============================================================================
// Module: dualid Runtime
// Description: Column type resolution and identifier generation.
// Purpose: Provide the default runtime services built on core types.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime services consume an explicit [`crate::IdentifierConfig`] and keep
//! no global state.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod generator;
pub mod resolver;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use generator::IdentifierGenerator;
pub use resolver::ColumnKind;
pub use resolver::DEFAULT_STRING_COLUMN_LENGTH;
pub use resolver::DefaultColumnTypeResolver;
pub use resolver::SqlDialect;
