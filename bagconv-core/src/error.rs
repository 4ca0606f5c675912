//! Error types for bagconv-core.

use thiserror::Error;

/// Result type alias for bagconv-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input file name cannot be mapped to an output layout.
    #[error("invalid input file name {file_name:?}: {reason}")]
    InvalidInput { file_name: String, reason: String },
}

impl Error {
    pub(crate) fn invalid_input(file_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            file_name: file_name.to_string(),
            reason: reason.into(),
        }
    }
}
