// crates/dualid-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Record Store
// Description: Table-backed records keyed by dual-kind identifiers.
// Purpose: Generate missing identifiers and persist them through the codec.
// Dependencies: dualid-core, rusqlite, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`SqliteRecordStore`] keeps one table of records. The primary key and the
//! optional reference column both use the codec's column definition, and
//! every value crosses the database boundary through
//! [`IdentifierColumnCodec`].
//!
//! The integer sequence lives in memory. On open it is advanced past the
//! largest integer identifier already stored, and supplied integer
//! identifiers advance it as they are inserted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use dualid_core::Identifier;
use dualid_core::IdentifierError;
use dualid_core::IdentifierGenerator;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::codec::IdentifierColumnCodec;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default table name.
const DEFAULT_TABLE: &str = "records";
/// Maximum table name length.
pub const MAX_TABLE_NAME_LENGTH: usize = 64;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode.
    #[default]
    Wal,
    /// Rollback journal with delete.
    Delete,
}

impl SqliteJournalMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// Configuration for the `SQLite` record store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `table` is ASCII alphanumerics or `_`, at most
///   [`MAX_TABLE_NAME_LENGTH`] characters, not starting with a digit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Table holding the records.
    #[serde(default = "default_table")]
    pub table: String,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
}

impl SqliteStoreConfig {
    /// Returns a config for `path` with default table and timeouts.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: default_table(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteJournalMode::default(),
        }
    }

    /// Validates the table name and path limits.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Invalid`] when a field is out of range.
    pub fn validate(&self) -> Result<(), SqliteStoreError> {
        validate_table_name(&self.table)?;
        validate_store_path(&self.path)
    }
}

/// Returns the default table name.
fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` record store errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Invalid store configuration or data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Identifier generation failed.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
}

impl From<rusqlite::Error> for SqliteStoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Db(error.to_string())
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// A stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Primary key.
    pub id: Identifier,
    /// Free-form label.
    pub label: String,
    /// Optional identifier of a related record.
    #[serde(with = "dualid_core::json::optional", default)]
    pub reference_id: Option<Identifier>,
}

/// Input for [`SqliteRecordStore::insert`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordDraft {
    /// Primary key. Generated when absent.
    pub id: Option<Identifier>,
    /// Free-form label.
    pub label: String,
    /// Optional identifier of a related record.
    pub reference_id: Option<Identifier>,
}

impl RecordDraft {
    /// Returns a draft with a generated id and no reference.
    #[must_use]
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            reference_id: None,
        }
    }

    /// Sets the primary key.
    #[must_use]
    pub fn with_id(mut self, id: Identifier) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the reference column.
    #[must_use]
    pub fn with_reference(mut self, reference_id: Identifier) -> Self {
        self.reference_id = Some(reference_id);
        self
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed record store.
///
/// # Invariants
/// - Every identifier column is written and read through `codec`.
/// - The generator's integer sequence stays ahead of stored integer ids.
#[derive(Clone)]
pub struct SqliteRecordStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Identifier column codec.
    codec: IdentifierColumnCodec,
    /// Identifier generator seeded from stored rows.
    generator: Arc<IdentifierGenerator>,
    /// Shared connection.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Opens the store, creating the table when missing.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the config is invalid or the
    /// database cannot be opened or initialized.
    pub fn open(
        config: SqliteStoreConfig,
        codec: IdentifierColumnCodec,
    ) -> Result<Self, SqliteStoreError> {
        config.validate()?;
        ensure_parent_dir(&config.path)?;
        let connection = open_connection(&config)?;
        initialize_table(&connection, &config.table, codec.column_definition())?;
        let generator = IdentifierGenerator::new(*codec.identifier_config());
        let max_integer = max_integer_id(&connection, &config.table, &codec)?;
        if let Some(max_integer) = max_integer {
            generator.advance_past(max_integer);
        }
        tracing::info!(
            path = %config.path.display(),
            table = %config.table,
            column = codec.column_definition(),
            max_integer_id = max_integer,
            "sqlite record store opened"
        );
        Ok(Self {
            config,
            codec,
            generator: Arc::new(generator),
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Returns the identifier column codec.
    #[must_use]
    pub const fn codec(&self) -> &IdentifierColumnCodec {
        &self.codec
    }

    /// Inserts a record, generating its id when the draft has none.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Identifier`] when the sequence is
    /// exhausted and [`SqliteStoreError::Db`] on constraint violations such
    /// as a duplicate id.
    pub fn insert(&self, draft: RecordDraft) -> Result<Record, SqliteStoreError> {
        let id = self.generator.generate(draft.id)?;
        let guard = self.lock()?;
        guard.execute(
            &format!(
                "INSERT INTO \"{}\" (id, label, reference_id) VALUES (?1, ?2, ?3)",
                self.config.table
            ),
            params![
                self.codec.write(Some(&id)),
                draft.label,
                self.codec.write(draft.reference_id.as_ref())
            ],
        )?;
        drop(guard);
        if let Ok(value) = id.as_integer() {
            self.generator.advance_past(value);
        }
        tracing::debug!(id = %id, "record inserted");
        Ok(Record {
            id,
            label: draft.label,
            reference_id: draft.reference_id,
        })
    }

    /// Loads the record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails or the stored row
    /// has no usable id.
    pub fn get(&self, id: &Identifier) -> Result<Option<Record>, SqliteStoreError> {
        let guard = self.lock()?;
        let record = guard
            .query_row(
                &format!(
                    "SELECT id, label, reference_id FROM \"{}\" WHERE id = ?1",
                    self.config.table
                ),
                params![self.codec.write(Some(id))],
                |row| self.map_row(row),
            )
            .optional()?;
        drop(guard);
        record.transpose()
    }

    /// Lists all records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails or a stored row has
    /// no usable id.
    pub fn list(&self) -> Result<Vec<Record>, SqliteStoreError> {
        let guard = self.lock()?;
        let mut stmt = guard.prepare(&format!(
            "SELECT id, label, reference_id FROM \"{}\" ORDER BY rowid",
            self.config.table
        ))?;
        let rows = stmt.query_map([], |row| self.map_row(row))?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row??);
        }
        Ok(records)
    }

    /// Deletes the record stored under `id`. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Db`] when the statement fails.
    pub fn delete(&self, id: &Identifier) -> Result<bool, SqliteStoreError> {
        let guard = self.lock()?;
        let removed = guard.execute(
            &format!("DELETE FROM \"{}\" WHERE id = ?1", self.config.table),
            params![self.codec.write(Some(id))],
        )?;
        Ok(removed > 0)
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))
    }

    /// Maps a `(id, label, reference_id)` row to a record.
    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<Result<Record, SqliteStoreError>> {
        let id = self.codec.read_column(row, 0)?;
        let label: String = row.get(1)?;
        let reference_id = self.codec.read_column(row, 2)?;
        Ok(id
            .map(|id| Record {
                id,
                label,
                reference_id,
            })
            .ok_or_else(|| SqliteStoreError::Invalid("stored record has an empty id".to_string())))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates table names so they can be interpolated into SQL.
fn validate_table_name(table: &str) -> Result<(), SqliteStoreError> {
    if table.is_empty() || table.len() > MAX_TABLE_NAME_LENGTH {
        return Err(SqliteStoreError::Invalid(format!(
            "table name must be 1..={MAX_TABLE_NAME_LENGTH} characters"
        )));
    }
    if table.starts_with(|c: char| c.is_ascii_digit())
        || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(SqliteStoreError::Invalid(format!(
            "table name must be ASCII alphanumerics or '_' and not start with a digit: {table}"
        )));
    }
    Ok(())
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    if path.components().any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH)
    {
        return Err(SqliteStoreError::Invalid(
            "store path contains an overlong component".to_string(),
        ));
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection and applies pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))?;
    connection.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    Ok(connection)
}

/// Creates the record table when missing.
fn initialize_table(
    connection: &Connection,
    table: &str,
    column_definition: &str,
) -> Result<(), SqliteStoreError> {
    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS \"{table}\" (id {column_definition} PRIMARY KEY NOT NULL, \
         label TEXT NOT NULL, reference_id {column_definition} NULL);"
    ))?;
    Ok(())
}

/// Returns the largest stored id that decodes as an integer.
fn max_integer_id(
    connection: &Connection,
    table: &str,
    codec: &IdentifierColumnCodec,
) -> Result<Option<i64>, SqliteStoreError> {
    let mut stmt = connection.prepare(&format!("SELECT id FROM \"{table}\""))?;
    let ids = stmt.query_map([], |row| codec.read_column(row, 0))?;
    let mut max = None;
    for id in ids {
        if let Some(value) = id?.and_then(|id| id.as_integer().ok()) {
            max = max.max(Some(value));
        }
    }
    Ok(max)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
