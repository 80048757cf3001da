//! Database layer for PasteLite.

/// Paste storage helpers.
pub mod paste;
/// redb table definitions.
pub mod tables;

use crate::error::AppError;
use redb::ReadableDatabase;
use std::path::Path;
use std::sync::Arc;

/// Database handle with access to the paste tables.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub pastes: paste::PasteDb,
}


impl Database {
    /// Build a database handle from an existing shared redb instance.
    ///
    /// # Errors
    /// Returns an error if the paste tables cannot be initialized.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            pastes: paste::PasteDb::new(db.clone())?,
            db,
        })
    }

    /// Clone this handle for another subsystem in the same process.
    ///
    /// # Errors
    /// Returns an error if table initialization fails.
    pub fn share(&self) -> Result<Self, AppError> {
        Self::from_shared(self.db.clone())
    }

    /// Open (or create) the database under `path` and initialize tables.
    ///
    /// `path` is a directory; the redb file lives inside it.
    ///
    /// # Errors
    /// Returns [`AppError::StoreUnavailable`] when the file cannot be opened,
    /// for example because another process holds it.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StoreMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;

        let file = dir.join(tables::REDB_FILE_NAME);
        let db = redb::Database::create(&file)?;
        tracing::debug!("Opened paste database at {}", file.display());
        Self::from_shared(Arc::new(db))
    }

    /// Check that the store answers a trivial read.
    ///
    /// # Errors
    /// Returns [`AppError::StoreUnavailable`] when a read transaction fails.
    pub fn ping(&self) -> Result<(), AppError> {
        let read_txn = self.db.begin_read()?;
        read_txn.open_table(tables::PASTES)?;
        Ok(())
    }
}
