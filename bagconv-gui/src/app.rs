//! Main application state and logic.
//!
//! Contains the `BagconvApp` struct which owns the UI state, starts
//! conversion workers and drains their events.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};

use bagconv_core::{ConversionEvent, ConversionJob, ExtractionSelection};
use bagconv_io::scan_captures;
use bagconv_worker::ConversionWorker;
use eframe::egui;

use crate::state::{FileSelection, ProcessingState};

/// Main application state.
pub struct BagconvApp {
    /// Path of the rs-convert executable.
    pub(crate) converter_path: Option<PathBuf>,
    /// Directory holding the captures; outputs are written next to them.
    pub(crate) capture_dir: Option<PathBuf>,
    /// Captures found in `capture_dir`.
    pub(crate) files: FileSelection,
    /// Artifacts to extract.
    pub(crate) extraction: ExtractionSelection,

    /// Worker for the current run; replaced on each start.
    pub(crate) worker: Option<ConversionWorker>,
    /// Event receiver for the current run.
    pub(crate) rx: Option<Receiver<ConversionEvent>>,
    /// Progress of the current or last run.
    pub(crate) processing: ProcessingState,

    /// Last error not tied to a file (scan, worker start).
    pub(crate) error: Option<String>,
}

impl Default for BagconvApp {
    fn default() -> Self {
        Self {
            converter_path: None,
            capture_dir: None,
            files: FileSelection::default(),
            extraction: ExtractionSelection::Both,
            worker: None,
            rx: None,
            processing: ProcessingState::default(),
            error: None,
        }
    }
}

impl BagconvApp {
    /// Load the captures of `dir` into the file list.
    pub fn open_directory(&mut self, dir: PathBuf) {
        match scan_captures(&dir) {
            Ok(names) => {
                log::info!("found {} capture(s) in {}", names.len(), dir.display());
                self.files.load(names);
                self.error = None;
            }
            Err(e) => {
                self.files.load(Vec::new());
                self.error = Some(e.to_string());
            }
        }
        self.capture_dir = Some(dir);
        self.processing = ProcessingState::default();
    }

    /// Whether a run can be started with the current inputs.
    pub fn can_start(&self) -> bool {
        !self.processing.is_running
            && self.converter_path.is_some()
            && self.capture_dir.is_some()
            && self.files.selected_count() > 0
    }

    /// Start converting the selected captures in the background.
    pub fn start_conversion(&mut self) {
        let (Some(converter), Some(dir)) = (self.converter_path.clone(), self.capture_dir.clone())
        else {
            return;
        };
        let names = self.files.selected_names();
        if names.is_empty() {
            self.error = Some("Please select at least one bag file to convert.".to_string());
            return;
        }

        let job = ConversionJob::new(converter, dir, names).with_extraction(self.extraction);
        let (tx, rx) = channel();
        let mut worker = ConversionWorker::new(job);
        if let Err(e) = worker.start(tx) {
            self.error = Some(e.to_string());
            return;
        }

        self.processing
            .begin(self.files.entries.iter().filter(|e| e.selected).map(|e| e.name.as_str()));
        self.error = None;
        self.worker = Some(worker);
        self.rx = Some(rx);
    }

    /// Ask the running worker to stop after the current file.
    pub fn cancel_conversion(&mut self) {
        if let Some(worker) = &self.worker {
            worker.cancel();
            self.processing.cancel_requested = true;
            self.processing.status_text = "Cancelling after the current file...".to_string();
        }
    }

    /// Handle pending events from the worker.
    pub fn handle_messages(&mut self) {
        let Some(rx) = &self.rx else {
            return;
        };
        let mut finished = false;
        while let Ok(event) = rx.try_recv() {
            finished |= event.is_terminal();
            event.dispatch(&mut self.processing);
        }
        if finished {
            self.rx = None;
            if let Some(mut worker) = self.worker.take() {
                // Terminal event already received; the thread is exiting.
                if let Err(e) = worker.join() {
                    self.error = Some(e.to_string());
                }
            }
        }
    }
}

impl eframe::App for BagconvApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_messages();
        self.render_side_panel(ctx);
        self.render_central_panel(ctx);
        self.render_summary_window(ctx);

        if self.processing.is_running {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
