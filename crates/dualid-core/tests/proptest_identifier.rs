//! Identifier property-based tests.
//!
//! ## Purpose
//! Check conversion and equality laws across arbitrary integers and strings.
//!
//! ## What is covered
//! - Integer canonical form and `as_integer` agree with `i64` formatting.
//! - Non-numeric text always stays text, numeric text converts when enabled.
//! - Equal identifiers hash equally under both equality modes.
// crates/dualid-core/tests/proptest_identifier.rs
// ============================================================================
// Module: Identifier Property-Based Tests
// Description: Conversion and hash/equality consistency properties.
// Purpose: Guard the invariants hash-based collections rely on.
// ============================================================================

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
    reason = "Test-only assertions and helpers are permitted."
)]

use dualid_core::EqualityMode;
use dualid_core::Identifier;
use dualid_core::IdentifierConfig;
use dualid_core::IdentifierKind;
use proptest::prelude::*;

fn any_config() -> impl Strategy<Value = IdentifierConfig> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(text_default, strict, convert)| {
        IdentifierConfig::default()
            .with_default_kind(if text_default {
                IdentifierKind::Text
            } else {
                IdentifierKind::Integer
            })
            .with_equality_mode(if strict { EqualityMode::Strict } else { EqualityMode::Canonical })
            .with_auto_convert(convert)
    })
}

fn any_identifier() -> impl Strategy<Value = Identifier> {
    prop_oneof![
        any::<i64>().prop_map(Identifier::of_integer),
        (-1_000i64..1_000).prop_map(|n| Identifier::of_text_verbatim(n.to_string()).unwrap()),
        "[a-z0-9~-]{1,12}".prop_map(|s| Identifier::of_text_verbatim(s).unwrap()),
    ]
}

proptest! {
    #[test]
    fn integer_canonical_form_is_decimal(n in any::<i64>()) {
        let id = Identifier::of_integer(n);
        prop_assert_eq!(id.as_string(), n.to_string());
        prop_assert_eq!(id.as_integer().unwrap(), n);
    }

    #[test]
    fn non_numeric_text_stays_text(s in "[a-z][a-z0-9_-]{0,16}", config in any_config()) {
        let id = Identifier::of_text(s.clone(), &config).unwrap();
        prop_assert_eq!(id.kind(), IdentifierKind::Text);
        prop_assert_eq!(id.as_string(), s);
    }

    #[test]
    fn numeric_text_converts_when_enabled(n in any::<i64>()) {
        let config = IdentifierConfig::default().with_auto_convert(true);
        let id = Identifier::of_text(n.to_string(), &config).unwrap();
        prop_assert_eq!(id.kind(), IdentifierKind::Integer);
        prop_assert_eq!(id.as_integer().unwrap(), n);
    }

    #[test]
    fn equal_identifiers_hash_equally(
        a in any_identifier(),
        b in any_identifier(),
        config in any_config(),
    ) {
        if a.equals(&b, &config) {
            prop_assert_eq!(a.hash_with(&config), b.hash_with(&config));
        }
        prop_assert!(a.equals(&a, &config));
        prop_assert_eq!(a.equals(&b, &config), b.equals(&a, &config));
    }
}
