// crates/dualid-core/src/lib.rs
// ============================================================================
// Module: dualid Core Library
// Description: Public API surface for the dual-kind identifier core.
// Purpose: Expose identifier types, interfaces, runtime helpers, and JSON codecs.
// Dependencies: crate::{core, interfaces, runtime, json}
// ============================================================================

//! ## Overview
//! `dualid-core` defines [`Identifier`], a value that holds either a 64-bit
//! integer or a non-empty string, together with the configuration that
//! governs its equality and conversion rules. It also provides the column
//! type resolver, the identifier generator, and two independent JSON codecs
//! that agree byte for byte on the wire form.
//!
//! Configuration is never ambient: every component that needs it is handed
//! an [`IdentifierConfig`] at construction or call time.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod json;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::ColumnTypeResolver;
pub use interfaces::JsonCodec;
pub use interfaces::JsonCodecError;
pub use json::SerdeJsonCodec;
pub use json::ValueTreeCodec;
pub use runtime::ColumnKind;
pub use runtime::DefaultColumnTypeResolver;
pub use runtime::IdentifierGenerator;
pub use runtime::SqlDialect;
