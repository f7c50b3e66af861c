// crates/dualid-config/src/config.rs
// ============================================================================
// Module: dualid Configuration
// Description: Configuration loading and validation for dualid.toml.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: dualid-core, dualid-store-sqlite, serde, toml, tracing
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section has defaults, so an empty file is a valid config. Invalid
//! settings fail closed at load time rather than on first use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use dualid_core::IdentifierConfig;
use dualid_core::IdentifierError;
use dualid_store_sqlite::CodecError;
use dualid_store_sqlite::IdentifierColumnCodec;
use dualid_store_sqlite::IdentifierColumnConfig;
use dualid_store_sqlite::SqliteJournalMode;
use dualid_store_sqlite::SqliteStoreConfig;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "dualid.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DUALID_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default database file.
const DEFAULT_STORE_PATH: &str = "dualid.db";
/// Default record table.
const DEFAULT_STORE_TABLE: &str = "records";
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum busy timeout (ms).
const MAX_BUSY_TIMEOUT_MS: u64 = 600_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Top-level `dualid.toml` configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DualIdConfig {
    /// Identifier semantics.
    #[serde(default)]
    pub identifier: IdentifierConfig,
    /// Identifier column layout.
    #[serde(default)]
    pub storage: IdentifierColumnConfig,
    /// Record store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Path the config was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl DualIdConfig {
    /// Loads configuration from disk using the default resolution rules:
    /// explicit path, then `DUALID_CONFIG`, then `./dualid.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| {
            ConfigError::Io(format!("{}: {err}", resolved.display()))
        })?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        tracing::info!(path = %resolved.display(), "config loaded");
        config.source_path = Some(resolved);
        Ok(config)
    }

    /// Like [`Self::load`], but a missing implicit `./dualid.toml` yields the
    /// defaults. Explicit and `DUALID_CONFIG` paths must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if path.is_none()
            && env::var_os(CONFIG_ENV_VAR).is_none()
            && !Path::new(DEFAULT_CONFIG_NAME).exists()
        {
            tracing::debug!("no config file found; using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, and
    /// the validation error otherwise.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build_codec()?;
        self.store.validate()
    }

    /// Returns the identifier semantics.
    #[must_use]
    pub const fn identifier_config(&self) -> IdentifierConfig {
        self.identifier
    }

    /// Builds the storage codec for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Identifier`] for unsupported dialects or zero
    /// lengths and [`ConfigError::Invalid`] for unsafe encodings.
    pub fn build_codec(&self) -> Result<IdentifierColumnCodec, ConfigError> {
        IdentifierColumnCodec::new(self.identifier, self.storage.clone()).map_err(|err| match err
        {
            CodecError::Identifier(err) => ConfigError::Identifier(err),
            CodecError::Invalid(message) => ConfigError::Invalid(format!("storage: {message}")),
        })
    }

    /// Returns the record store settings in store form.
    #[must_use]
    pub fn store_config(&self) -> SqliteStoreConfig {
        self.store.to_sqlite()
    }
}

/// `[store]` section.
///
/// # Invariants
/// - `path` is non-empty and within path length limits.
/// - `table` is a valid record table name.
/// - `busy_timeout_ms` is at most ten minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// `SQLite` database path.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Record table name.
    #[serde(default = "default_store_table")]
    pub table: String,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            table: default_store_table(),
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteJournalMode::default(),
        }
    }
}

impl StoreConfig {
    /// Validates store settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a setting is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("store.path", &self.path.to_string_lossy())?;
        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "store.busy_timeout_ms must be at most {MAX_BUSY_TIMEOUT_MS}"
            )));
        }
        self.to_sqlite()
            .validate()
            .map_err(|err| ConfigError::Invalid(format!("store: {err}")))
    }

    /// Converts to the record store config.
    #[must_use]
    pub fn to_sqlite(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path: self.path.clone(),
            table: self.table.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
        }
    }
}

/// Default database path.
fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

/// Default record table.
fn default_store_table() -> String {
    DEFAULT_STORE_TABLE.to_string()
}

/// Default busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Identifier settings rejected by the column resolver.
    #[error("invalid config: {0}")]
    Identifier(#[from] IdentifierError),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    if path.components().any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH)
    {
        return Err(ConfigError::Invalid("config path component too long".to_string()));
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if Path::new(trimmed)
        .components()
        .any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH)
    {
        return Err(ConfigError::Invalid(format!("{field} path component too long")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_path_string_rejects_whitespace_only() {
        let result = validate_path_string("store.path", "   ");
        assert_eq!(result, Err(ConfigError::Invalid("store.path must be non-empty".to_string())));
    }

    #[test]
    fn validate_path_string_rejects_component_too_long() {
        let value = format!("dir/{}", "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1));
        assert!(validate_path_string("store.path", &value).is_err());
        let value = format!("dir/{}", "a".repeat(MAX_PATH_COMPONENT_LENGTH));
        assert!(validate_path_string("store.path", &value).is_ok());
    }

    #[test]
    fn explicit_path_wins_resolution() {
        let resolved = resolve_path(Some(Path::new("custom.toml")));
        assert_eq!(resolved, Ok(PathBuf::from("custom.toml")));
    }
}
