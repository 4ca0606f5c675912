//! bagconv-worker: Background execution of conversion jobs.
//!
//! [`ConversionWorker`] owns one job and runs it on its own thread.
//! Progress is reported through a [`bagconv_core::ProgressReporter`],
//! typically an `mpsc::Sender<ConversionEvent>` drained by the UI loop.
//!

mod cancel;
mod error;
mod run;
mod worker;

pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use run::run_job;
pub use worker::{ConversionWorker, WorkerState};
