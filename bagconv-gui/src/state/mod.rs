//! Application state modules.

mod files;
mod processing;

pub use files::{FileEntry, FileSelection};
pub use processing::{FileStatus, ProcessingState};
