//! bagconv-io: Filesystem and subprocess I/O for bagconv.
//!
//! This crate runs the external converter, prepares per-capture output
//! directories and discovers capture files on disk.
//!

pub mod converter;
mod error;
pub mod fs;
pub mod scanner;

pub use converter::{ConvertError, Converter, ExternalConverter};
pub use error::{Error, Result};
pub use fs::{copy_capture, prepare_output_dirs};
pub use scanner::scan_captures;
