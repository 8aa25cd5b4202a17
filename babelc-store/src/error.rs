//! Store error types

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for file-store operations
///
/// A missing source or artifact is never an error; lookups report absence
/// through `Option`. These variants cover failures unrelated to absence.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid type name: {reason}")]
    InvalidName { reason: String },

    #[error("store lock poisoned")]
    LockPoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
