//! Run state as seen by the UI.
//!
//! Updated only on the UI thread, from events drained off the worker's
//! channel.

use std::collections::HashMap;

use bagconv_core::{
    format_eta, ConversionOutcome, FileRecord, ProgressReporter, ProgressUpdate, RunSummary,
};

/// Per-file status shown next to each capture in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Queued,
    Converting,
    Done,
    Failed(String),
    Skipped,
}

/// Tracks the state of the background conversion run.
pub struct ProcessingState {
    /// Whether a run is in progress.
    pub is_running: bool,
    /// Whether cancellation was requested for the current run.
    pub cancel_requested: bool,
    /// Progress value from 0.0 to 1.0.
    pub progress: f32,
    /// User-facing status message.
    pub status_text: String,
    /// Remaining-time text, empty when unknown.
    pub eta_text: String,
    /// Status of each file of the current or last run.
    pub file_status: HashMap<String, FileStatus>,
    /// Summary of the last finished run, until dismissed.
    pub last_summary: Option<RunSummary>,
}

impl Default for ProcessingState {
    fn default() -> Self {
        Self {
            is_running: false,
            cancel_requested: false,
            progress: 0.0,
            status_text: "Ready to convert".to_string(),
            eta_text: String::new(),
            file_status: HashMap::new(),
            last_summary: None,
        }
    }
}

impl ProcessingState {
    /// Reset for a new run over `files`.
    pub fn begin<'a>(&mut self, files: impl IntoIterator<Item = &'a str>) {
        *self = Self {
            is_running: true,
            status_text: "Starting conversion...".to_string(),
            file_status: files
                .into_iter()
                .map(|name| (name.to_string(), FileStatus::Queued))
                .collect(),
            ..Self::default()
        };
    }

    #[must_use]
    pub fn status_of(&self, name: &str) -> Option<&FileStatus> {
        self.file_status.get(name)
    }

    fn finish(&mut self, summary: &RunSummary, headline: &str) {
        self.is_running = false;
        self.cancel_requested = false;
        self.eta_text.clear();
        for record in &summary.records {
            if record.outcome == ConversionOutcome::Skipped {
                self.file_status
                    .insert(record.file_name.clone(), FileStatus::Skipped);
            }
        }
        self.status_text = format!("{headline}: {summary}");
        self.last_summary = Some(summary.clone());
    }
}

impl ProgressReporter for ProcessingState {
    fn on_file_started(&mut self, name: &str) {
        self.file_status
            .insert(name.to_string(), FileStatus::Converting);
    }

    fn on_status(&mut self, text: &str) {
        self.status_text = text.to_string();
    }

    fn on_progress(&mut self, update: &ProgressUpdate) {
        self.progress = update.fraction();
        self.eta_text = update
            .eta
            .filter(|_| update.completed < update.total)
            .map(format_eta)
            .unwrap_or_default();
    }

    fn on_file_failed(&mut self, name: &str, reason: &str) {
        log::warn!("{name}: {reason}");
    }

    fn on_file_finished(&mut self, record: &FileRecord) {
        let status = match &record.outcome {
            ConversionOutcome::Success => FileStatus::Done,
            ConversionOutcome::Failure(reason) => FileStatus::Failed(reason.clone()),
            ConversionOutcome::Skipped => FileStatus::Skipped,
        };
        self.file_status.insert(record.file_name.clone(), status);
    }

    fn on_run_completed(&mut self, summary: &RunSummary) {
        self.progress = 1.0;
        self.finish(summary, "Conversion completed");
    }

    fn on_run_cancelled(&mut self, summary: &RunSummary) {
        self.finish(summary, "Conversion cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bagconv_core::ConversionEvent;
    use std::time::Duration;

    #[test]
    fn test_events_drive_state() {
        let mut state = ProcessingState::default();
        state.begin(["a.bag", "b.bag"]);
        assert!(state.is_running);
        assert_eq!(state.status_of("b.bag"), Some(&FileStatus::Queued));

        let events = vec![
            ConversionEvent::FileStarted("a.bag".into()),
            ConversionEvent::FileFinished(FileRecord::new(
                "a.bag",
                ConversionOutcome::Failure("image: exit code 1".into()),
            )),
            ConversionEvent::Progress(ProgressUpdate {
                completed: 1,
                total: 2,
                current_file: "a.bag".into(),
                elapsed: Duration::from_secs(30),
                eta: Some(Duration::from_secs(30)),
            }),
        ];
        for event in events {
            event.dispatch(&mut state);
        }
        assert!((state.progress - 0.5).abs() < f32::EPSILON);
        assert_eq!(state.eta_text, "Est. 30 seconds remaining");
        assert!(matches!(state.status_of("a.bag"), Some(FileStatus::Failed(_))));

        let summary = RunSummary::from_records(
            vec![
                FileRecord::new("a.bag", ConversionOutcome::Failure("x".into())),
                FileRecord::new("b.bag", ConversionOutcome::Skipped),
            ],
            Duration::from_secs(31),
            true,
        );
        ConversionEvent::RunCancelled(summary).dispatch(&mut state);

        assert!(!state.is_running);
        assert_eq!(state.status_of("b.bag"), Some(&FileStatus::Skipped));
        assert!(state.status_text.starts_with("Conversion cancelled"));
        assert!(state.eta_text.is_empty());
        assert_eq!(state.last_summary.as_ref().map(|s| s.skipped), Some(1));
    }
}
