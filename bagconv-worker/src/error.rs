//! Worker lifecycle errors.
//!
//! Failures of individual files never surface here; they are recorded in
//! the run summary.

use thiserror::Error;

/// Result type for worker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Worker lifecycle errors.
#[derive(Error, Debug)]
pub enum Error {
    /// `start` was called on a worker that already ran.
    #[error("worker already started; create a new worker for each run")]
    AlreadyStarted,

    /// `join` was called before `start`.
    #[error("worker has not been started")]
    NotStarted,

    /// The worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The worker thread panicked.
    #[error("worker thread panicked")]
    Panicked,
}
