//! Progress events emitted by a conversion run.
//!
//! A run reports through a [`ProgressReporter`]. Reporters are called on the
//! worker thread, so a presentation layer normally hands the worker an
//! `mpsc::Sender<ConversionEvent>` and drains the receiver on its own loop,
//! replaying each event with [`ConversionEvent::dispatch`].

use std::sync::mpsc::Sender;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::outcome::{FileRecord, RunSummary};
use crate::progress;

/// Snapshot sent after each file completes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressUpdate {
    /// Files finished so far (success or failure).
    pub completed: usize,
    /// Files in the job.
    pub total: usize,
    /// File that just finished.
    pub current_file: String,
    /// Time since the run started.
    pub elapsed: Duration,
    /// Estimated time left; `None` before the first file completes.
    pub eta: Option<Duration>,
}

impl ProgressUpdate {
    /// Completed fraction in `[0.0, 1.0]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        progress::fraction(self.completed, self.total)
    }

    /// Completed percentage, rounded down.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> u8 {
        (self.fraction() * 100.0).floor() as u8
    }
}

/// Receiver of run events.
///
/// Methods are invoked from the worker thread in strict file order; the
/// terminal callback (`on_run_completed` or `on_run_cancelled`) is always
/// the last one of a run.
pub trait ProgressReporter {
    /// A file is about to be processed.
    fn on_file_started(&mut self, name: &str);

    /// Free-form status line for display.
    fn on_status(&mut self, _text: &str) {}

    /// A file finished; counters and time estimate were updated.
    fn on_progress(&mut self, update: &ProgressUpdate);

    /// A step failed for `name`. May be called more than once per file.
    fn on_file_failed(&mut self, name: &str, reason: &str);

    /// Final outcome for a processed file.
    fn on_file_finished(&mut self, _record: &FileRecord) {}

    /// The file list was exhausted.
    fn on_run_completed(&mut self, summary: &RunSummary);

    /// The run stopped early because cancellation was requested.
    fn on_run_cancelled(&mut self, summary: &RunSummary);
}

/// Reporter that discards everything.
pub struct NoOpReporter;

impl ProgressReporter for NoOpReporter {
    fn on_file_started(&mut self, _name: &str) {}
    fn on_progress(&mut self, _update: &ProgressUpdate) {}
    fn on_file_failed(&mut self, _name: &str, _reason: &str) {}
    fn on_run_completed(&mut self, _summary: &RunSummary) {}
    fn on_run_cancelled(&mut self, _summary: &RunSummary) {}
}

/// Owned form of a reporter callback, safe to send across threads.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConversionEvent {
    FileStarted(String),
    Status(String),
    Progress(ProgressUpdate),
    FileFailed { name: String, reason: String },
    FileFinished(FileRecord),
    RunCompleted(RunSummary),
    RunCancelled(RunSummary),
}

impl ConversionEvent {
    /// Whether this event ends the run.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConversionEvent::RunCompleted(_) | ConversionEvent::RunCancelled(_)
        )
    }

    /// Replay this event onto `reporter`.
    pub fn dispatch<R: ProgressReporter + ?Sized>(self, reporter: &mut R) {
        match self {
            ConversionEvent::FileStarted(name) => reporter.on_file_started(&name),
            ConversionEvent::Status(text) => reporter.on_status(&text),
            ConversionEvent::Progress(update) => reporter.on_progress(&update),
            ConversionEvent::FileFailed { name, reason } => reporter.on_file_failed(&name, &reason),
            ConversionEvent::FileFinished(record) => reporter.on_file_finished(&record),
            ConversionEvent::RunCompleted(summary) => reporter.on_run_completed(&summary),
            ConversionEvent::RunCancelled(summary) => reporter.on_run_cancelled(&summary),
        }
    }
}

/// Collects events in memory.
impl ProgressReporter for Vec<ConversionEvent> {
    fn on_file_started(&mut self, name: &str) {
        self.push(ConversionEvent::FileStarted(name.to_string()));
    }

    fn on_status(&mut self, text: &str) {
        self.push(ConversionEvent::Status(text.to_string()));
    }

    fn on_progress(&mut self, update: &ProgressUpdate) {
        self.push(ConversionEvent::Progress(update.clone()));
    }

    fn on_file_failed(&mut self, name: &str, reason: &str) {
        self.push(ConversionEvent::FileFailed {
            name: name.to_string(),
            reason: reason.to_string(),
        });
    }

    fn on_file_finished(&mut self, record: &FileRecord) {
        self.push(ConversionEvent::FileFinished(record.clone()));
    }

    fn on_run_completed(&mut self, summary: &RunSummary) {
        self.push(ConversionEvent::RunCompleted(summary.clone()));
    }

    fn on_run_cancelled(&mut self, summary: &RunSummary) {
        self.push(ConversionEvent::RunCancelled(summary.clone()));
    }
}

/// Forwards events over a channel. A disconnected receiver is ignored; the
/// run still completes.
impl ProgressReporter for Sender<ConversionEvent> {
    fn on_file_started(&mut self, name: &str) {
        let _ = self.send(ConversionEvent::FileStarted(name.to_string()));
    }

    fn on_status(&mut self, text: &str) {
        let _ = self.send(ConversionEvent::Status(text.to_string()));
    }

    fn on_progress(&mut self, update: &ProgressUpdate) {
        let _ = self.send(ConversionEvent::Progress(update.clone()));
    }

    fn on_file_failed(&mut self, name: &str, reason: &str) {
        let _ = self.send(ConversionEvent::FileFailed {
            name: name.to_string(),
            reason: reason.to_string(),
        });
    }

    fn on_file_finished(&mut self, record: &FileRecord) {
        let _ = self.send(ConversionEvent::FileFinished(record.clone()));
    }

    fn on_run_completed(&mut self, summary: &RunSummary) {
        let _ = self.send(ConversionEvent::RunCompleted(summary.clone()));
    }

    fn on_run_cancelled(&mut self, summary: &RunSummary) {
        let _ = self.send(ConversionEvent::RunCancelled(summary.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ConversionOutcome;
    use std::sync::mpsc::channel;

    fn update(completed: usize, total: usize) -> ProgressUpdate {
        ProgressUpdate {
            completed,
            total,
            current_file: "a.bag".to_string(),
            elapsed: Duration::from_secs(4),
            eta: None,
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(update(1, 3).percent(), 33);
        assert_eq!(update(3, 3).percent(), 100);
    }

    #[test]
    fn test_channel_roundtrip_dispatch() {
        let (mut tx, rx) = channel::<ConversionEvent>();
        tx.on_file_started("a.bag");
        tx.on_file_failed("a.bag", "boom");
        tx.on_file_finished(&FileRecord::new(
            "a.bag",
            ConversionOutcome::Failure("boom".into()),
        ));
        tx.on_run_completed(&RunSummary::default());
        drop(tx);

        let mut replayed: Vec<ConversionEvent> = Vec::new();
        for event in rx {
            event.dispatch(&mut replayed);
        }
        assert_eq!(replayed.len(), 4);
        assert_eq!(replayed[0], ConversionEvent::FileStarted("a.bag".into()));
        assert!(replayed[3].is_terminal());
        assert!(!replayed[1].is_terminal());
    }

    #[test]
    fn test_send_to_closed_channel_is_ignored() {
        let (mut tx, rx) = channel::<ConversionEvent>();
        drop(rx);
        tx.on_status("still running");
        tx.on_run_cancelled(&RunSummary::default());
    }
}
