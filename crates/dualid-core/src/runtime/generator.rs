// crates/dualid-core/src/runtime/generator.rs
// ============================================================================
// Module: Identifier Generator
// Description: Supplies identifiers for records created without one.
// Purpose: Fill missing IDs according to the configured default kind.
// Dependencies: tracing, uuid, crate::core
// ============================================================================

//! ## Overview
//! Integer defaults draw from a lock-free in-process sequence that starts at
//! 1. The sequence is not unique across restarts or across generator
//! instances; callers that persist identifiers should seed it with
//! [`IdentifierGenerator::starting_at`]. Text defaults produce random UUID v4
//! strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use uuid::Uuid;

use crate::core::Identifier;
use crate::core::IdentifierConfig;
use crate::core::IdentifierError;
use crate::core::IdentifierKind;

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Generates identifiers for records that arrive without one.
#[derive(Debug)]
pub struct IdentifierGenerator {
    /// Identifier semantics, copied in at construction.
    config: IdentifierConfig,
    /// Last integer handed out, or the value just below the start.
    last_issued: AtomicI64,
}

impl IdentifierGenerator {
    /// Creates a generator whose integer sequence starts at 1.
    #[must_use]
    pub const fn new(config: IdentifierConfig) -> Self {
        Self::starting_at(config, 1)
    }

    /// Creates a generator whose integer sequence starts at `start`.
    /// A start of `i64::MIN` behaves like `i64::MIN + 1`.
    #[must_use]
    pub const fn starting_at(config: IdentifierConfig, start: i64) -> Self {
        Self {
            config,
            last_issued: AtomicI64::new(start.saturating_sub(1)),
        }
    }

    /// Returns the configuration this generator was built with.
    #[must_use]
    pub const fn config(&self) -> &IdentifierConfig {
        &self.config
    }

    /// Returns `existing` unchanged, or a freshly generated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::SequenceExhausted`] once `i64::MAX` has
    /// been handed out.
    pub fn generate(&self, existing: Option<Identifier>) -> Result<Identifier, IdentifierError> {
        if let Some(id) = existing {
            return Ok(id);
        }
        let id = match self.config.default_kind {
            IdentifierKind::Integer => Identifier::of_integer(self.next_sequence()?),
            IdentifierKind::Text => Identifier::of_text_verbatim(Uuid::new_v4().to_string())?,
        };
        tracing::trace!(kind = %id.kind(), id = %id, "generated identifier");
        Ok(id)
    }

    /// Moves the sequence forward so the next value is greater than `floor`.
    pub fn advance_past(&self, floor: i64) {
        self.last_issued.fetch_max(floor, Ordering::Relaxed);
    }

    /// Takes the next sequence value.
    fn next_sequence(&self) -> Result<i64, IdentifierError> {
        let mut issued = None;
        self.last_issued
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
                issued = last.checked_add(1);
                issued
            })
            .map_err(|_| IdentifierError::SequenceExhausted)?;
        issued.ok_or(IdentifierError::SequenceExhausted)
    }
}
