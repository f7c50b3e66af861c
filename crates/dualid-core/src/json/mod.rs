// crates/dualid-core/src/json/mod.rs
// ============================================================================
// Module: Identifier JSON Codecs
// Description: Two independent JSON codecs for identifiers.
// Purpose: Keep the wire form a bare JSON string across serialization paths.
// Dependencies: serde, serde_json, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The wire form of an identifier is always a bare JSON string (or `null`),
//! never a JSON number, so clients that read numbers as doubles cannot lose
//! precision.
//!
//! Two codecs are provided and must agree byte for byte:
//! - [`SerdeJsonCodec`] drives the streaming `serde` impls on [`Identifier`].
//! - [`ValueTreeCodec`] builds and inspects a `serde_json::Value` tree and
//!   never touches those impls.
//!
//! Accepted input shapes form a closed set: `null`, a string, an integer, or
//! an object whose `id` field holds one of those scalars. Empty strings,
//! `null`, and objects without `id` decode to `None`.
//!
//! [`Identifier`]: crate::Identifier

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod serde_impl;
pub mod tree;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use serde_impl::SerdeJsonCodec;
pub use serde_impl::optional;
pub use tree::ValueTreeCodec;

// ============================================================================
// SECTION: Shared Constants
// ============================================================================

/// Object field unwrapped when an identifier arrives as a JSON object.
pub const ID_FIELD: &str = "id";
