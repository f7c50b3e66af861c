// crates/dualid-core/src/core/config.rs
// ============================================================================
// Module: Identifier Configuration
// Description: Equality, default kind, and auto-conversion settings.
// Purpose: Carry identifier semantics explicitly instead of through globals.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`IdentifierConfig`] is built once at startup and copied into every
//! component that needs it. It is `Copy`, so holders never share a mutable
//! instance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifier::IdentifierKind;

// ============================================================================
// SECTION: Equality Mode
// ============================================================================

/// How two identifiers are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EqualityMode {
    /// Equal when the canonical string forms match, regardless of kind.
    #[default]
    #[serde(alias = "canonical_string", alias = "string")]
    Canonical,
    /// Equal only when kind and value both match.
    Strict,
}

impl EqualityMode {
    /// Returns the stable label used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::Strict => "strict",
        }
    }
}

// ============================================================================
// SECTION: Identifier Config
// ============================================================================

/// Identifier semantics shared by equality, codecs, and the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentifierConfig {
    /// Kind used for generated identifiers and ambiguous input.
    #[serde(default)]
    pub default_kind: IdentifierKind,
    /// Equality rule applied by configuration-aware comparisons.
    #[serde(default)]
    pub equality_mode: EqualityMode,
    /// Promote integer-looking text to the integer kind at construction.
    #[serde(default = "default_auto_convert")]
    pub auto_convert_text_to_integer: bool,
}

impl IdentifierConfig {
    /// Returns a config using strict equality and no auto-conversion.
    #[must_use]
    pub const fn strict(default_kind: IdentifierKind) -> Self {
        Self {
            default_kind,
            equality_mode: EqualityMode::Strict,
            auto_convert_text_to_integer: false,
        }
    }

    /// Returns a copy with the given default kind.
    #[must_use]
    pub const fn with_default_kind(mut self, default_kind: IdentifierKind) -> Self {
        self.default_kind = default_kind;
        self
    }

    /// Returns a copy with the given equality mode.
    #[must_use]
    pub const fn with_equality_mode(mut self, equality_mode: EqualityMode) -> Self {
        self.equality_mode = equality_mode;
        self
    }

    /// Returns a copy with auto-conversion toggled.
    #[must_use]
    pub const fn with_auto_convert(mut self, enabled: bool) -> Self {
        self.auto_convert_text_to_integer = enabled;
        self
    }
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            default_kind: IdentifierKind::Integer,
            equality_mode: EqualityMode::Canonical,
            auto_convert_text_to_integer: default_auto_convert(),
        }
    }
}

/// Auto-conversion is enabled unless configured otherwise.
const fn default_auto_convert() -> bool {
    true
}
