use bagconv_core::{ProgressReporter, ProgressUpdate, RunSummary};
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over the files of a run.
pub struct TerminalReporter {
    pb: ProgressBar,
}

impl TerminalReporter {
    pub fn new(total: usize) -> Self {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} Converting [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("#>-")),
        );
        Self::with_bar(pb)
    }

    pub fn with_bar(pb: ProgressBar) -> Self {
        Self { pb }
    }
}

impl ProgressReporter for TerminalReporter {
    fn on_file_started(&mut self, name: &str) {
        self.pb.set_message(name.to_string());
    }

    fn on_status(&mut self, text: &str) {
        log::info!("{text}");
    }

    fn on_progress(&mut self, update: &ProgressUpdate) {
        self.pb.set_position(update.completed as u64);
    }

    fn on_file_failed(&mut self, name: &str, reason: &str) {
        self.pb.println(format!("error in {name}: {reason}"));
    }

    fn on_run_completed(&mut self, _summary: &RunSummary) {
        self.pb.finish_with_message("done");
    }

    fn on_run_cancelled(&mut self, _summary: &RunSummary) {
        self.pb.abandon_with_message("cancelled");
    }
}
