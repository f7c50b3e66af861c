// crates/dualid-core/src/runtime/resolver.rs
// ============================================================================
// Module: Column Type Resolver
// Description: Maps identifier kinds and dialects to column definitions.
// Purpose: Resolve physical column types once, at configuration time.
// Dependencies: serde, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Integer identifiers map to `BIGINT` and text identifiers to
//! `VARCHAR(n)`. Dialect names are matched case-insensitively against a
//! closed set; anything else is rejected so misconfiguration surfaces at
//! startup rather than on the first row.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::core::IdentifierError;
use crate::core::IdentifierKind;
use crate::interfaces::ColumnTypeResolver;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default `VARCHAR` length for text identifier columns.
pub const DEFAULT_STRING_COLUMN_LENGTH: u32 = 255;

// ============================================================================
// SECTION: Column Kind
// ============================================================================

/// Logical SQL column type for an identifier column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// 64-bit signed integer column.
    BigInt,
    /// Variable-length character column.
    Varchar,
}

impl ColumnKind {
    /// Returns the SQL type name.
    #[must_use]
    pub const fn sql_name(self) -> &'static str {
        match self {
            Self::BigInt => "BIGINT",
            Self::Varchar => "VARCHAR",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

// ============================================================================
// SECTION: Dialects
// ============================================================================

/// Supported database dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlDialect {
    /// `MySQL` and compatible servers.
    MySql,
    /// `PostgreSQL`.
    PostgreSql,
    /// H2 embedded database.
    H2,
    /// `SQLite`.
    Sqlite,
}

impl SqlDialect {
    /// Returns the canonical lowercase dialect name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::PostgreSql => "postgresql",
            Self::H2 => "h2",
            Self::Sqlite => "sqlite",
        }
    }

    /// Returns the dialect's 64-bit integer column syntax.
    ///
    /// `SQLite` uses `BIGINT` rather than `INTEGER` so that a primary key
    /// column does not become a rowid alias, which would reject text values.
    #[must_use]
    pub const fn integer_column_syntax(self) -> &'static str {
        match self {
            Self::MySql | Self::PostgreSql | Self::H2 | Self::Sqlite => "BIGINT",
        }
    }

    /// Returns the dialect's variable-length string column syntax.
    #[must_use]
    pub fn string_column_syntax(self, length: u32) -> String {
        match self {
            Self::MySql | Self::PostgreSql | Self::H2 | Self::Sqlite => {
                format!("VARCHAR({length})")
            }
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlDialect {
    type Err = IdentifierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::InvalidArgument(
                "database dialect must be non-empty".to_string(),
            ));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "postgresql" | "postgres" => Ok(Self::PostgreSql),
            "h2" => Ok(Self::H2),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(IdentifierError::UnsupportedDialect(trimmed.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Default Resolver
// ============================================================================

/// Default resolver covering the supported dialect set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultColumnTypeResolver;

impl ColumnTypeResolver for DefaultColumnTypeResolver {
    fn resolve_column_kind(&self, kind: IdentifierKind) -> ColumnKind {
        match kind {
            IdentifierKind::Integer => ColumnKind::BigInt,
            IdentifierKind::Text => ColumnKind::Varchar,
        }
    }

    fn column_definition(
        &self,
        kind: IdentifierKind,
        dialect: &str,
        string_length: u32,
    ) -> Result<String, IdentifierError> {
        if string_length == 0 {
            return Err(IdentifierError::InvalidArgument(
                "string column length must be greater than zero".to_string(),
            ));
        }
        let dialect = dialect.parse::<SqlDialect>()?;
        Ok(match self.resolve_column_kind(kind) {
            ColumnKind::BigInt => dialect.integer_column_syntax().to_string(),
            ColumnKind::Varchar => dialect.string_column_syntax(string_length),
        })
    }
}
