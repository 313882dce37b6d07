//! redb-based storage for compiled label artifacts
//!
//! One PDF per box id, write-once: the artifact for a box is compiled
//! exactly once at box creation; reprints reuse it.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Label artifacts table: key = box id, value = PDF bytes
const LABELS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("labels");

#[derive(Debug, Error)]
pub enum LabelStoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Label already stored for box {0}")]
    AlreadyExists(i64),

    #[error("No label stored for box {0}")]
    NotFound(i64),
}

pub type LabelStoreResult<T> = Result<T, LabelStoreError>;

/// Compiled label artifact storage
#[derive(Clone)]
pub struct LabelStore {
    db: Arc<Database>,
}

impl LabelStore {
    /// Open or create the artifact database
    pub fn open(path: impl AsRef<Path>) -> LabelStoreResult<Self> {
        let db = Database::create(path)?;

        // Initialize table
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LABELS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> LabelStoreResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LABELS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Store the artifact for a box. Write-once: a second put for the
    /// same box id fails with [`LabelStoreError::AlreadyExists`]. The
    /// existence check and insert share one write transaction, so
    /// racing duplicate inserts are rejected rather than overwritten.
    pub fn put(&self, box_id: i64, bytes: &[u8]) -> LabelStoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(LABELS_TABLE)?;
            if table.get(box_id)?.is_some() {
                return Err(LabelStoreError::AlreadyExists(box_id));
            }
            table.insert(box_id, bytes)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Fetch the artifact for a box
    pub fn get(&self, box_id: i64) -> LabelStoreResult<Vec<u8>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LABELS_TABLE)?;

        match table.get(box_id)? {
            Some(guard) => Ok(guard.value().to_vec()),
            None => Err(LabelStoreError::NotFound(box_id)),
        }
    }
}
