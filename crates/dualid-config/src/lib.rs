// crates/dualid-config/src/lib.rs
// ============================================================================
// Module: dualid Config Library
// Description: Configuration model, loading, and validation for dualid.toml.
// Purpose: Single source of truth for identifier, storage, and store settings.
// Dependencies: dualid-core, dualid-store-sqlite, serde, toml, tracing
// ============================================================================

//! ## Overview
//! `dualid-config` loads `dualid.toml` with strict size and path limits and
//! validates it fail-closed. A config that loads successfully can always
//! build its storage codec and open its record store configuration, so
//! unsupported dialects and bad table names surface at startup.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
