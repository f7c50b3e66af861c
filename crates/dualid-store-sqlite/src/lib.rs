// crates/dualid-store-sqlite/src/lib.rs
// ============================================================================
// Module: dualid SQLite Storage
// Description: Identifier column codec and SQLite-backed record store.
// Purpose: Persist identifiers in BIGINT or VARCHAR columns without losing kind.
// Dependencies: dualid-core, rusqlite, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`IdentifierColumnCodec`] converts identifiers to and from `SQLite`
//! values for a configured column layout. [`SqliteRecordStore`] is a small
//! table-backed store that generates missing identifiers and writes every
//! identifier column through the codec.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod codec;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use codec::CodecError;
pub use codec::IdentifierColumnCodec;
pub use codec::IdentifierColumnConfig;
pub use codec::StorageEncoding;
pub use codec::TAG_MARKER;
pub use store::MAX_TABLE_NAME_LENGTH;
pub use store::Record;
pub use store::RecordDraft;
pub use store::SqliteJournalMode;
pub use store::SqliteRecordStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
