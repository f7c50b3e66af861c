// crates/dualid-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the CLI.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `dualid.toml`. Every key is spelled out with its
//! default value so the example doubles as a reference.

/// Returns a canonical example `dualid.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[identifier]
default_kind = "integer"
equality_mode = "canonical"
auto_convert_text_to_integer = true

[storage]
use_native_column_types = true
string_column_length = 255
database_dialect = "sqlite"
# encoding = "tagged"

[store]
path = "dualid.db"
table = "records"
busy_timeout_ms = 5000
journal_mode = "wal"
"#,
    )
}
