//! Error types for the driver

use babelc_store::StoreError;
use thiserror::Error;

/// Fatal driver errors.
///
/// Expected outcomes - missing sources, failed toolchain invocations - are
/// reported as [`Resolution`](crate::Resolution) values, never through
/// this type. What remains is resource failure: the session cannot
/// proceed without its handle or its store.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("toolchain session construction failed: {source}")]
    SessionConstruction {
        #[source]
        source: ToolchainError,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("session state poisoned")]
    StatePoisoned,
}

/// Error type for toolchain invocations.
///
/// Raised by [`Toolchain`](crate::Toolchain) implementations when the
/// external compiler itself cannot be driven. The parse and compile
/// services catch these at their boundary and convert them into failure
/// results; only handle construction re-raises them.
#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("toolchain unavailable: {0}")]
    Unavailable(String),

    #[error("invocation failed: {0}")]
    Invocation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
