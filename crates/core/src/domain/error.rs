use thiserror::Error;

/// Error taxonomy for the vocabulary core. The Scheduler and Lifecycle Machine never
/// produce these themselves -- they are total functions over validated input;
/// `InvalidArgument` is raised at the boundary before values reach them.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("exhausted: {0}")]
    Exhausted(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
