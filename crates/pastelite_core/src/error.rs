//! Application error types for core storage and domain logic.
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] redb::Error),

    #[error("Store unavailable: {0}")]
    StoreMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Paste not found or expired")]
    NotFoundOrExpired,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to allocate a unique paste id after {attempts} attempts")]
    ExhaustedRetries { attempts: usize },
}

impl AppError {
    /// Whether a caller may reasonably retry the failed operation.
    ///
    /// # Returns
    /// `true` for substrate failures and id-allocation exhaustion.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_) | Self::StoreMessage(_) | Self::ExhaustedRetries { .. }
        )
    }
}

impl From<redb::DatabaseError> for AppError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::StoreUnavailable(value.into())
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(value: redb::TransactionError) -> Self {
        Self::StoreUnavailable(value.into())
    }
}

impl From<redb::TableError> for AppError {
    fn from(value: redb::TableError) -> Self {
        Self::StoreUnavailable(value.into())
    }
}

impl From<redb::StorageError> for AppError {
    fn from(value: redb::StorageError) -> Self {
        Self::StoreUnavailable(value.into())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(value: redb::CommitError) -> Self {
        Self::StoreUnavailable(value.into())
    }
}
