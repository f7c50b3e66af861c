// crates/dualid-store-sqlite/tests/codec.rs
// ============================================================================
// Module: Identifier Column Codec Tests
// Description: Column layout, write values, and permissive reads.
// Purpose: Validate codec construction errors, tagged encoding, and legacy
//          rows read through a real SQLite connection.
// ============================================================================

//! ## Overview
//! Unit-level tests for the identifier column codec:
//! - Construction rejects unsupported dialects and unsafe encodings
//! - Write values match the declared column type
//! - Reads of `NULL`, empty, real, blob, and legacy text values never fail
//! - Tagged payloads survive `SQLite` numeric affinity

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

use dualid_core::ColumnKind;
use dualid_core::EqualityMode;
use dualid_core::Identifier;
use dualid_core::IdentifierConfig;
use dualid_core::IdentifierError;
use dualid_core::IdentifierKind;
use dualid_store_sqlite::CodecError;
use dualid_store_sqlite::IdentifierColumnCodec;
use dualid_store_sqlite::IdentifierColumnConfig;
use dualid_store_sqlite::StorageEncoding;
use rusqlite::Connection;
use rusqlite::params;
use rusqlite::types::Value;
use rusqlite::types::ValueRef;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn codec(identifier: IdentifierConfig, native: bool) -> IdentifierColumnCodec {
    let column = IdentifierColumnConfig {
        use_native_column_types: native,
        ..IdentifierColumnConfig::default()
    };
    IdentifierColumnCodec::new(identifier, column).expect("codec")
}

fn text(value: &str) -> Identifier {
    Identifier::of_text_verbatim(value).expect("text id")
}

/// Writes `id` into a one-column table declared with the codec's column
/// definition and reads it back.
fn store_and_load(codec: &IdentifierColumnCodec, id: Option<&Identifier>) -> Option<Identifier> {
    let connection = Connection::open_in_memory().expect("open");
    connection
        .execute_batch(&format!("CREATE TABLE t (v {});", codec.column_definition()))
        .expect("create");
    connection.execute("INSERT INTO t (v) VALUES (?1)", params![codec.write(id)]).expect("insert");
    connection
        .query_row("SELECT v FROM t", [], |row| codec.read_column(row, 0))
        .expect("select")
}

// ============================================================================
// SECTION: Construction
// ============================================================================

#[test]
fn default_layout_is_native_bigint_and_tagged() {
    let codec = codec(IdentifierConfig::default(), true);
    assert_eq!(codec.column_kind(), ColumnKind::BigInt);
    assert_eq!(codec.column_definition(), "BIGINT");
    assert_eq!(codec.encoding(), StorageEncoding::Tagged);
}

#[test]
fn non_native_layout_is_varchar() {
    let codec = IdentifierColumnCodec::new(IdentifierConfig::default(), IdentifierColumnConfig {
        use_native_column_types: false,
        string_column_length: 64,
        database_dialect: "postgresql".to_string(),
        encoding: None,
    })
    .unwrap();
    assert_eq!(codec.column_kind(), ColumnKind::Varchar);
    assert_eq!(codec.column_definition(), "VARCHAR(64)");
}

#[test]
fn unsupported_dialect_fails_at_construction() {
    let column = IdentifierColumnConfig {
        database_dialect: "oracle".to_string(),
        ..IdentifierColumnConfig::default()
    };
    let err = IdentifierColumnCodec::new(IdentifierConfig::default(), column).unwrap_err();
    assert_eq!(err, CodecError::Identifier(IdentifierError::UnsupportedDialect("oracle".into())));
}

#[test]
fn zero_string_length_fails_at_construction() {
    let column = IdentifierColumnConfig {
        string_column_length: 0,
        ..IdentifierColumnConfig::default()
    };
    let err = IdentifierColumnCodec::new(IdentifierConfig::default(), column).unwrap_err();
    assert!(matches!(err, CodecError::Identifier(IdentifierError::InvalidArgument(_))));
}

#[test]
fn canonical_encoding_requires_auto_convert() {
    let column = IdentifierColumnConfig {
        encoding: Some(StorageEncoding::Canonical),
        ..IdentifierColumnConfig::default()
    };
    let err = IdentifierColumnCodec::new(IdentifierConfig::strict(IdentifierKind::Text), column)
        .unwrap_err();
    assert!(matches!(err, CodecError::Invalid(_)));
}

#[test]
fn canonical_encoding_requires_canonical_equality() {
    let column = IdentifierColumnConfig {
        use_native_column_types: false,
        encoding: Some(StorageEncoding::Canonical),
        ..IdentifierColumnConfig::default()
    };
    let strict = IdentifierConfig::default().with_equality_mode(EqualityMode::Strict);
    let err = IdentifierColumnCodec::new(strict, column).unwrap_err();
    assert!(matches!(err, CodecError::Invalid(message) if message.contains("canonical equality")));
}

#[test]
fn canonical_encoding_requires_varchar_column() {
    let column = IdentifierColumnConfig {
        encoding: Some(StorageEncoding::Canonical),
        ..IdentifierColumnConfig::default()
    };
    let err = IdentifierColumnCodec::new(IdentifierConfig::default(), column).unwrap_err();
    assert!(matches!(err, CodecError::Invalid(message) if message.contains("VARCHAR")));
}

#[test]
fn canonical_encoding_is_accepted_for_varchar_columns() {
    let column = IdentifierColumnConfig {
        use_native_column_types: false,
        encoding: Some(StorageEncoding::Canonical),
        ..IdentifierColumnConfig::default()
    };
    let codec = IdentifierColumnCodec::new(IdentifierConfig::default(), column).unwrap();
    assert_eq!(codec.encoding(), StorageEncoding::Canonical);
    let id = Identifier::of_text("123", codec.identifier_config()).unwrap();
    assert_eq!(store_and_load(&codec, Some(&id)), Some(Identifier::of_integer(123)));
    let id = text("1e5");
    assert_eq!(store_and_load(&codec, Some(&id)), Some(id));
}

#[test]
fn disabled_auto_convert_implies_tagged_encoding() {
    let codec = codec(IdentifierConfig::strict(IdentifierKind::Integer), true);
    assert_eq!(codec.encoding(), StorageEncoding::Tagged);
}

// ============================================================================
// SECTION: Write Values
// ============================================================================

#[test]
fn native_integer_column_binds_integers() {
    let codec = codec(IdentifierConfig::default(), true);
    assert_eq!(codec.write(Some(&Identifier::of_integer(7))), Value::Integer(7));
    assert_eq!(codec.write(Some(&text("abc"))), Value::Text("abc".to_string()));
    assert_eq!(codec.write(Some(&text("1e5"))), Value::Text("~1e5".to_string()));
    assert_eq!(codec.write(None), Value::Null);
}

#[test]
fn varchar_column_binds_canonical_text() {
    let codec = codec(IdentifierConfig::default(), false);
    assert_eq!(codec.write(Some(&Identifier::of_integer(-7))), Value::Text("-7".to_string()));
}

#[test]
fn tagged_encoding_marks_ambiguous_text_only() {
    let codec = codec(IdentifierConfig::strict(IdentifierKind::Text), true);
    assert_eq!(codec.write(Some(&text("123"))), Value::Text("~123".to_string()));
    assert_eq!(codec.write(Some(&text("~x"))), Value::Text("~~x".to_string()));
    assert_eq!(codec.write(Some(&text("abc"))), Value::Text("abc".to_string()));
    assert_eq!(codec.write(Some(&Identifier::of_integer(123))), Value::Text("123".to_string()));
}

// ============================================================================
// SECTION: Permissive Reads
// ============================================================================

#[test]
fn null_and_empty_values_read_as_none() {
    let codec = codec(IdentifierConfig::default(), true);
    assert_eq!(codec.read(ValueRef::Null), None);
    assert_eq!(codec.read(ValueRef::Text(b"")), None);
    assert_eq!(codec.assemble(None), None);
    assert_eq!(codec.assemble(Some("")), None);
}

#[test]
fn real_values_read_as_integer_when_integral() {
    let codec = codec(IdentifierConfig::default(), true);
    assert_eq!(codec.read(ValueRef::Real(42.0)), Some(Identifier::of_integer(42)));
    assert_eq!(codec.read(ValueRef::Real(1.5)), Some(text("1.5")));
}

#[test]
fn blob_values_decode_as_text() {
    let codec = codec(IdentifierConfig::default(), false);
    assert_eq!(codec.read(ValueRef::Blob(b"99")), Some(Identifier::of_integer(99)));
    assert_eq!(codec.read(ValueRef::Blob(b"key")), Some(text("key")));
}

#[test]
fn legacy_rows_in_integer_column_read_permissively() {
    let codec = codec(IdentifierConfig::default(), true);
    let connection = Connection::open_in_memory().unwrap();
    connection.execute_batch("CREATE TABLE legacy (v BIGINT);").unwrap();
    connection
        .execute_batch("INSERT INTO legacy (v) VALUES ('42'), ('abc'), (NULL), ('');")
        .unwrap();
    let mut stmt = connection.prepare("SELECT v FROM legacy ORDER BY rowid").unwrap();
    let values: Vec<Option<Identifier>> = stmt
        .query_map([], |row| codec.read_column(row, 0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(values, vec![Some(Identifier::of_integer(42)), Some(text("abc")), None, None]);
}

#[test]
fn lone_marker_reads_as_text() {
    let codec = codec(IdentifierConfig::strict(IdentifierKind::Text), false);
    assert_eq!(codec.read(ValueRef::Text(b"~")), Some(text("~")));
    assert_eq!(codec.read(ValueRef::Text(b"~~")), Some(text("~")));
}

// ============================================================================
// SECTION: Round Trips
// ============================================================================

#[test]
fn custom_text_id_round_trips_through_varchar_column() {
    let config = IdentifierConfig::default().with_default_kind(IdentifierKind::Text);
    let codec = codec(config, true);
    assert_eq!(codec.column_definition(), "VARCHAR(255)");
    let id = Identifier::of_text("custom-id", &config).unwrap();
    let loaded = store_and_load(&codec, Some(&id)).unwrap();
    assert!(codec.equals(&loaded, &id));
}

#[test]
fn tagged_numeric_text_survives_bigint_affinity() {
    let config = IdentifierConfig::strict(IdentifierKind::Integer);
    let codec = codec(config, true);
    for value in ["123", "007", "1e5", " 12", "~", "~9"] {
        let id = text(value);
        let loaded = store_and_load(&codec, Some(&id)).unwrap();
        assert!(loaded.equals_in(&id, EqualityMode::Strict), "{value} became {loaded:?}");
    }
    let loaded = store_and_load(&codec, Some(&Identifier::of_integer(5))).unwrap();
    assert_eq!(loaded, Identifier::of_integer(5));
}

#[test]
fn default_config_keeps_numeric_looking_text() {
    let codec = codec(IdentifierConfig::default(), true);
    for value in ["1e5", " 12", "12 ", "1.0", "007", "+5", "123"] {
        let id = text(value);
        let loaded = store_and_load(&codec, Some(&id)).unwrap();
        assert_eq!(loaded, id, "{value} became {loaded:?}");
    }
}

#[test]
fn strict_text_default_keeps_integer_looking_text() {
    let config = IdentifierConfig {
        default_kind: IdentifierKind::Text,
        equality_mode: EqualityMode::Strict,
        auto_convert_text_to_integer: true,
    };
    for native in [true, false] {
        let codec = codec(config, native);
        assert_eq!(codec.encoding(), StorageEncoding::Tagged);
        let id = Identifier::of_default_kind("123", &config).unwrap();
        let loaded = store_and_load(&codec, Some(&id)).unwrap();
        assert!(codec.equals(&loaded, &id), "read back as {loaded:?}");
    }
}

#[test]
fn cache_form_matches_stored_text() {
    let codec = codec(IdentifierConfig::strict(IdentifierKind::Text), false);
    let id = text("123");
    let cached = codec.disassemble(Some(&id)).unwrap();
    assert_eq!(cached, "~123");
    assert_eq!(codec.assemble(Some(&cached)), Some(id));
    assert_eq!(codec.disassemble(Some(&Identifier::of_integer(8))).as_deref(), Some("8"));
}

#[test]
fn equality_and_hash_follow_config() {
    let codec = codec(IdentifierConfig::default(), true);
    let left = Identifier::of_integer(123);
    let right = text("123");
    assert!(codec.equals(&left, &right));
    assert_eq!(codec.hash(&left), codec.hash(&right));
}
