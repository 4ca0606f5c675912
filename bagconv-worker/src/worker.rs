//! Background worker owning one conversion run.

use std::thread::{self, JoinHandle};

use bagconv_core::{ConversionJob, ProgressReporter, RunSummary};
use bagconv_io::{Converter, ExternalConverter};
use log::debug;

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::run::run_job;

/// Lifecycle of a [`ConversionWorker`].
///
/// `Idle -> Running -> {Completed, Cancelled}`; the last two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl WorkerState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkerState::Completed | WorkerState::Cancelled)
    }
}

/// Runs a single [`ConversionJob`] on a dedicated thread.
///
/// A worker is used for exactly one run; start a new worker for the next
/// job. Dropping a running worker detaches its thread, which still runs
/// until the next cancellation check or the end of the job.
pub struct ConversionWorker<C: Converter + 'static = ExternalConverter> {
    job: Option<ConversionJob>,
    converter: Option<C>,
    cancel: CancelToken,
    state: WorkerState,
    handle: Option<JoinHandle<RunSummary>>,
}

impl ConversionWorker<ExternalConverter> {
    /// Worker invoking the job's external executable.
    #[must_use]
    pub fn new(job: ConversionJob) -> Self {
        let converter = ExternalConverter::new(job.executable());
        Self::with_converter(job, converter)
    }
}

impl<C: Converter + 'static> ConversionWorker<C> {
    /// Worker using a custom converter.
    pub fn with_converter(job: ConversionJob, converter: C) -> Self {
        Self {
            job: Some(job),
            converter: Some(converter),
            cancel: CancelToken::new(),
            state: WorkerState::Idle,
            handle: None,
        }
    }

    /// Start the run on a new thread and return immediately.
    ///
    /// All further communication happens through `reporter`, which is moved
    /// to the worker thread.
    ///
    /// # Errors
    /// Returns [`Error::AlreadyStarted`] if the worker has already been
    /// started, or [`Error::Spawn`] if the thread cannot be created.
    pub fn start<R>(&mut self, mut reporter: R) -> Result<()>
    where
        R: ProgressReporter + Send + 'static,
    {
        if self.state != WorkerState::Idle {
            return Err(Error::AlreadyStarted);
        }
        let (Some(job), Some(converter)) = (self.job.take(), self.converter.take()) else {
            return Err(Error::AlreadyStarted);
        };
        let cancel = self.cancel.clone();

        debug!("starting worker for {} file(s)", job.len());
        let handle = thread::Builder::new()
            .name("bagconv-worker".to_string())
            .spawn(move || run_job(&job, &converter, &cancel, &mut reporter))?;

        self.handle = Some(handle);
        self.state = WorkerState::Running;
        Ok(())
    }

    /// Request cancellation. Idempotent.
    ///
    /// The conversion in flight is allowed to finish; no further file is
    /// started.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Handle for cancelling from elsewhere without borrowing the worker.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Whether the worker thread has exited. Never blocks.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match &self.handle {
            Some(handle) => handle.is_finished(),
            None => self.state.is_terminal(),
        }
    }

    /// Wait for the run to end and return its summary.
    ///
    /// # Errors
    /// Returns [`Error::NotStarted`] if the worker was never started or was
    /// already joined, or [`Error::Panicked`] if the worker thread panicked.
    pub fn join(&mut self) -> Result<RunSummary> {
        let handle = self.handle.take().ok_or(Error::NotStarted)?;
        let summary = handle.join().map_err(|_| Error::Panicked)?;
        self.state = if summary.cancelled {
            WorkerState::Cancelled
        } else {
            WorkerState::Completed
        };
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bagconv_core::{ConversionEvent, NoOpReporter};
    use std::sync::mpsc::channel;

    #[test]
    fn test_lifecycle() {
        let job = ConversionJob::new("/missing/rs-convert", "/nonexistent", Vec::<String>::new());
        let mut worker = ConversionWorker::new(job);
        assert_eq!(worker.state(), WorkerState::Idle);
        assert!(matches!(worker.join(), Err(Error::NotStarted)));

        let (tx, rx) = channel::<ConversionEvent>();
        worker.start(tx).unwrap();
        assert_eq!(worker.state(), WorkerState::Running);
        assert!(matches!(worker.start(NoOpReporter), Err(Error::AlreadyStarted)));

        let summary = worker.join().unwrap();
        assert_eq!(summary.attempted, 0);
        assert_eq!(worker.state(), WorkerState::Completed);
        assert!(worker.is_finished());
        assert!(rx.recv().unwrap().is_terminal());
    }
}
