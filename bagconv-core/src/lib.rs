//! bagconv-core: Core types for batch capture conversion.
//!
//! This crate provides the pure building blocks of a conversion run:
//! output layout planning, job description, per-file outcomes, progress
//! events and time estimation. It performs no I/O.
//!

pub mod error;
pub mod event;
pub mod job;
pub mod layout;
pub mod outcome;
pub mod progress;

pub use error::{Error, Result};
pub use event::{ConversionEvent, NoOpReporter, ProgressReporter, ProgressUpdate};
pub use job::{ConversionJob, ExtractionSelection};
pub use layout::{plan, ConvertMode, FileOutputLayout, CAPTURE_EXTENSION};
pub use outcome::{ConversionOutcome, FileRecord, ModeResults, RunSummary};
pub use progress::{estimate_remaining, format_eta, fraction};
