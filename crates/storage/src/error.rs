use thiserror::Error;
use vocab_core::CoreError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("other error: {0}")]
    Other(String),
}

/// Storage failures become `CoreError::Internal` at the port boundary, except
/// for the two kinds the core's error taxonomy distinguishes on purpose:
/// `NotFound` (no such row) and `Conflict` (lost a compare-and-swap).
impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => CoreError::NotFound(msg),
            StorageError::Conflict(msg) => CoreError::Conflict(msg),
            other => CoreError::Internal(other.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
