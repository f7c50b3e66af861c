// crates/dualid-core/tests/identifier.rs
// ============================================================================
// Module: Identifier Tests
// Description: Construction, conversion, and equality of dual-kind identifiers.
// Purpose: Pin the canonical string form and the configured equality rules.
// Dependencies: dualid-core
// ============================================================================
//! ## Overview
//! Exercises the three construction paths, lossy auto-conversion, and the
//! canonical versus strict equality modes.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::HashSet;

use dualid_core::EqualityMode;
use dualid_core::Identifier;
use dualid_core::IdentifierConfig;
use dualid_core::IdentifierError;
use dualid_core::IdentifierKind;
use dualid_core::IdentifierValue;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn canonical() -> IdentifierConfig {
    IdentifierConfig::default()
}

fn strict_no_convert() -> IdentifierConfig {
    IdentifierConfig::strict(IdentifierKind::Integer)
}

// ============================================================================
// SECTION: Construction
// ============================================================================

#[test]
fn integer_identifier_renders_decimal() {
    let id = Identifier::of_integer(123);
    assert_eq!(id.as_string(), "123");
    assert_eq!(id.to_string(), "123");
    assert_eq!(id.kind(), IdentifierKind::Integer);
    assert_eq!(id.as_integer().unwrap(), 123);
    assert!(id.is_integer());
    assert!(id.as_text().is_none());
}

#[test]
fn text_identifier_keeps_non_numeric_content() {
    let id = Identifier::of_text("abc123", &canonical()).unwrap();
    assert_eq!(id.kind(), IdentifierKind::Text);
    assert_eq!(id.as_text(), Some("abc123"));
    assert_eq!(id.value(), &IdentifierValue::Text("abc123".to_string()));
}

#[test]
fn text_identifier_auto_converts_numeric_content() {
    let id = Identifier::of_text("456", &canonical()).unwrap();
    assert_eq!(id.kind(), IdentifierKind::Integer);
    assert_eq!(id.as_integer().unwrap(), 456);
}

#[test]
fn text_identifier_stays_text_without_auto_convert() {
    let id = Identifier::of_text("456", &strict_no_convert()).unwrap();
    assert_eq!(id.kind(), IdentifierKind::Text);
    assert_eq!(id.as_integer().unwrap(), 456);
}

#[test]
fn auto_convert_drops_leading_zeros() {
    let id = Identifier::of_text("007", &canonical()).unwrap();
    assert_eq!(id.kind(), IdentifierKind::Integer);
    assert_eq!(id.as_string(), "7");
}

#[test]
fn auto_convert_ignores_padded_numbers() {
    let id = Identifier::of_text(" 42", &canonical()).unwrap();
    assert_eq!(id.kind(), IdentifierKind::Text);
    assert_eq!(id.as_string(), " 42");
}

#[test]
fn empty_text_is_rejected() {
    let err = Identifier::of_text("", &canonical()).unwrap_err();
    assert!(matches!(err, IdentifierError::InvalidArgument(_)));
    assert!(Identifier::of_text_verbatim("").is_err());
    assert!(Identifier::from_canonical("").is_err());
    assert!(Identifier::of_default_kind("", &canonical()).is_err());
}

#[test]
fn as_integer_fails_for_non_numeric_text() {
    let id = Identifier::of_text("custom-id", &canonical()).unwrap();
    let err = id.as_integer().unwrap_err();
    assert!(matches!(err, IdentifierError::Parse(_)));
}

#[test]
fn default_kind_guides_ambiguous_input() {
    let integer_default = canonical().with_auto_convert(false);
    let text_default = integer_default.with_default_kind(IdentifierKind::Text);

    let parsed = Identifier::of_default_kind("99", &integer_default).unwrap();
    assert_eq!(parsed.kind(), IdentifierKind::Integer);
    let fallback = Identifier::of_default_kind("user-9", &integer_default).unwrap();
    assert_eq!(fallback.kind(), IdentifierKind::Text);
    let verbatim = Identifier::of_default_kind("99", &text_default).unwrap();
    assert_eq!(verbatim.kind(), IdentifierKind::Text);
}

#[test]
fn from_canonical_prefers_integers() {
    assert_eq!(Identifier::from_canonical("-5").unwrap(), Identifier::of_integer(-5));
    assert_eq!(Identifier::from_canonical("x5").unwrap().kind(), IdentifierKind::Text);
}

#[test]
fn kind_parses_from_config_labels() {
    assert_eq!("LONG".parse::<IdentifierKind>().unwrap(), IdentifierKind::Integer);
    assert_eq!("integer".parse::<IdentifierKind>().unwrap(), IdentifierKind::Integer);
    assert_eq!(" String ".parse::<IdentifierKind>().unwrap(), IdentifierKind::Text);
    assert!(matches!(
        "uuid".parse::<IdentifierKind>(),
        Err(IdentifierError::InvalidArgument(_))
    ));
    assert!(matches!("".parse::<IdentifierKind>(), Err(IdentifierError::InvalidArgument(_))));
}

// ============================================================================
// SECTION: Equality
// ============================================================================

#[test]
fn canonical_equality_crosses_kinds() {
    let config = canonical();
    let integer = Identifier::of_integer(123);
    let text = Identifier::of_text_verbatim("123").unwrap();
    assert!(integer.equals(&text, &config));
    assert_eq!(integer.hash_with(&config), text.hash_with(&config));
}

#[test]
fn strict_equality_separates_kinds() {
    let config = canonical().with_equality_mode(EqualityMode::Strict);
    let integer = Identifier::of_integer(123);
    let text = Identifier::of_text_verbatim("123").unwrap();
    assert!(!integer.equals(&text, &config));
    assert!(integer.equals(&Identifier::of_integer(123), &config));
    assert_ne!(integer, text);
}

#[test]
fn keyed_identifiers_deduplicate_by_mode() {
    let ids = [Identifier::of_integer(7), Identifier::of_text_verbatim("7").unwrap()];

    let canonical_set: HashSet<_> =
        ids.iter().cloned().map(|id| id.keyed(EqualityMode::Canonical)).collect();
    assert_eq!(canonical_set.len(), 1);

    let strict_set: HashSet<_> =
        ids.iter().cloned().map(|id| id.keyed(EqualityMode::Strict)).collect();
    assert_eq!(strict_set.len(), 2);
}
