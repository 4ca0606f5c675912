//! The per-file conversion loop.

use std::fmt::Display;
use std::path::Path;
use std::time::Instant;

use bagconv_core::{
    estimate_remaining, format_eta, plan, ConversionJob, ConversionOutcome, ConvertMode,
    FileRecord, ModeResults, ProgressReporter, ProgressUpdate, RunSummary,
};
use bagconv_io::{copy_capture, prepare_output_dirs, ConvertError, Converter};
use log::{debug, info, warn};

use crate::cancel::CancelToken;

/// Run `job` to completion or cancellation on the calling thread.
///
/// For each file in order: plan the layout, create the output
/// directories, copy the capture, then run every selected extraction mode.
/// Per-file errors are recorded and the loop moves on. `cancel` is checked
/// before each file; an in-flight conversion is never interrupted.
///
/// Exactly one terminal event (`on_run_completed` or `on_run_cancelled`)
/// is reported, always last.
pub fn run_job<C, R>(
    job: &ConversionJob,
    converter: &C,
    cancel: &CancelToken,
    reporter: &mut R,
) -> RunSummary
where
    C: Converter + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let start = Instant::now();
    let total = job.len();
    info!(
        "converting {total} file(s) from {} into {} ({})",
        job.source_dir().display(),
        job.working_dir().display(),
        job.extraction()
    );

    let mut records = Vec::with_capacity(total);
    let mut cancelled = false;

    for (index, name) in job.file_names().iter().enumerate() {
        if cancel.is_cancelled() {
            info!("cancellation requested after {index} of {total} file(s)");
            cancelled = true;
            break;
        }

        reporter.on_file_started(name);
        reporter.on_status(&format!("Starting file {}/{total}: {name}", index + 1));

        let outcome = convert_file(job, converter, name, reporter);
        match &outcome {
            ConversionOutcome::Failure(reason) => warn!("{name}: {reason}"),
            _ => debug!("{name}: done"),
        }
        let record = FileRecord::new(name.as_str(), outcome);
        reporter.on_file_finished(&record);
        records.push(record);

        let completed = records.len();
        let elapsed = start.elapsed();
        let update = ProgressUpdate {
            completed,
            total,
            current_file: name.clone(),
            elapsed,
            eta: estimate_remaining(elapsed, completed, total),
        };
        reporter.on_progress(&update);

        let mut status = format!("Completed file {completed}/{total}: {name}");
        if let Some(eta) = update.eta.filter(|_| completed < total) {
            status.push_str(" - ");
            status.push_str(&format_eta(eta));
        }
        reporter.on_status(&status);
    }

    if cancelled {
        let processed = records.len();
        records.extend(
            job.file_names()[processed..]
                .iter()
                .map(|name| FileRecord::new(name.as_str(), ConversionOutcome::Skipped)),
        );
    }

    let summary = RunSummary::from_records(records, start.elapsed(), cancelled);
    info!("run {}: {summary}", if cancelled { "cancelled" } else { "completed" });
    if cancelled {
        reporter.on_run_cancelled(&summary);
    } else {
        reporter.on_run_completed(&summary);
    }
    summary
}

/// Process a single capture; never aborts the run.
fn convert_file<C, R>(
    job: &ConversionJob,
    converter: &C,
    name: &str,
    reporter: &mut R,
) -> ConversionOutcome
where
    C: Converter + ?Sized,
    R: ProgressReporter + ?Sized,
{
    // Validate before touching the filesystem.
    let layout = match plan(job.working_dir(), name) {
        Ok(layout) => layout,
        Err(e) => return fail(reporter, name, e),
    };

    reporter.on_status(&format!("Creating folders for {name}"));
    if let Err(e) = prepare_output_dirs(&layout, job.extraction()) {
        return fail(reporter, name, e);
    }

    reporter.on_status(&format!("Copying {name}"));
    let source = job.source_path(name);
    if let Err(e) = copy_capture(&source, &layout) {
        return fail(reporter, name, e);
    }

    let mut results = ModeResults::default();
    for &mode in job.extraction().modes() {
        reporter.on_status(&format!("Extracting {mode} frames from {name}"));
        let result = run_mode(converter, &source, layout.output_dir(mode), mode);
        if let Err(e) = &result {
            reporter.on_file_failed(name, &e.to_string());
        }
        results.record(mode, result);
    }
    results.outcome()
}

fn run_mode<C: Converter + ?Sized>(
    converter: &C,
    source: &Path,
    output_dir: &Path,
    mode: ConvertMode,
) -> Result<(), ConvertError> {
    let start = Instant::now();
    let result = converter.convert(source, output_dir, mode);
    debug!(
        "{mode} pass on {} took {:.2}s",
        source.display(),
        start.elapsed().as_secs_f64()
    );
    result
}

fn fail<R: ProgressReporter + ?Sized>(
    reporter: &mut R,
    name: &str,
    err: impl Display,
) -> ConversionOutcome {
    let reason = err.to_string();
    reporter.on_file_failed(name, &reason);
    ConversionOutcome::Failure(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bagconv_core::{ConversionEvent, ExtractionSelection};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records calls; fails the modes listed in `failing`.
    #[derive(Default)]
    struct FakeConverter {
        failing: Vec<ConvertMode>,
        calls: Mutex<Vec<(PathBuf, PathBuf, ConvertMode)>>,
        cancel_after: Option<(usize, CancelToken)>,
    }

    impl Converter for FakeConverter {
        fn convert(
            &self,
            input: &Path,
            output_dir: &Path,
            mode: ConvertMode,
        ) -> Result<(), ConvertError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((input.to_path_buf(), output_dir.to_path_buf(), mode));
            if let Some((n, token)) = &self.cancel_after {
                if calls.len() == *n {
                    token.cancel();
                }
            }
            if self.failing.contains(&mode) {
                return Err(ConvertError::Failed {
                    mode,
                    code: Some(1),
                    stderr: "no frames".to_string(),
                });
            }
            Ok(())
        }
    }

    fn workdir_with(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"capture").unwrap();
        }
        dir
    }

    fn summary_of(events: &[ConversionEvent]) -> &RunSummary {
        match events.last() {
            Some(ConversionEvent::RunCompleted(s) | ConversionEvent::RunCancelled(s)) => s,
            other => panic!("last event is not terminal: {other:?}"),
        }
    }

    #[test]
    fn test_all_files_succeed() {
        let dir = workdir_with(&["a.bag", "b.bag"]);
        let job = ConversionJob::new("unused", dir.path(), ["a.bag", "b.bag"]);
        let converter = FakeConverter::default();
        let mut events: Vec<ConversionEvent> = Vec::new();

        let summary = run_job(&job, &converter, &CancelToken::new(), &mut events);

        assert_eq!((summary.succeeded, summary.failed, summary.skipped), (2, 0, 0));
        assert!(matches!(events.last(), Some(ConversionEvent::RunCompleted(_))));
        assert_eq!(summary_of(&events), &summary);

        let calls = converter.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].0, dir.path().join("a.bag"));
        assert_eq!(calls[0].1, dir.path().join("a/a_ply/ply"));
        assert_eq!(calls[1].1, dir.path().join("a/a_png/png"));
        assert_eq!(calls[3].1, dir.path().join("b/b_png/png"));
        assert!(dir.path().join("b/b.bag").is_file());
    }

    #[test]
    fn test_invalid_name_fails_without_invoking_converter() {
        let dir = workdir_with(&["good.bag"]);
        let job = ConversionJob::new("unused", dir.path(), ["notes.txt", "good.bag", ".bag"]);
        let converter = FakeConverter::default();
        let mut events: Vec<ConversionEvent> = Vec::new();

        let summary = run_job(&job, &converter, &CancelToken::new(), &mut events);

        assert_eq!((summary.succeeded, summary.failed, summary.skipped), (1, 2, 0));
        assert_eq!(converter.calls.lock().unwrap().len(), 2);
        assert!(!dir.path().join("notes").exists());
        assert!(events.iter().any(|e| matches!(
            e,
            ConversionEvent::FileFailed { name, .. } if name == "notes.txt"
        )));
    }

    #[test]
    fn test_point_cloud_failure_still_runs_image_pass() {
        let dir = workdir_with(&["a.bag", "b.bag"]);
        let job = ConversionJob::new("unused", dir.path(), ["a.bag", "b.bag"]);
        let converter = FakeConverter {
            failing: vec![ConvertMode::PointCloud],
            ..FakeConverter::default()
        };
        let mut events: Vec<ConversionEvent> = Vec::new();

        let summary = run_job(&job, &converter, &CancelToken::new(), &mut events);

        assert_eq!(converter.calls.lock().unwrap().len(), 4);
        assert_eq!(summary.failed, 2);
        let ConversionOutcome::Failure(reason) = &summary.records[0].outcome else {
            panic!("expected failure");
        };
        assert!(reason.starts_with("point cloud:"), "{reason}");
        assert!(!reason.contains("image:"));
    }

    #[test]
    fn test_progress_is_monotonic_with_eta() {
        let names = ["a.bag", "b.bag", "c.bag"];
        let dir = workdir_with(&names);
        let job = ConversionJob::new("unused", dir.path(), names);
        let mut events: Vec<ConversionEvent> = Vec::new();

        run_job(&job, &FakeConverter::default(), &CancelToken::new(), &mut events);

        let updates: Vec<&ProgressUpdate> = events
            .iter()
            .filter_map(|e| match e {
                ConversionEvent::Progress(u) => Some(u),
                _ => None,
            })
            .collect();
        let completed: Vec<usize> = updates.iter().map(|u| u.completed).collect();
        assert_eq!(completed, [1, 2, 3]);
        assert!(updates.iter().all(|u| u.total == 3 && u.eta.is_some()));
        assert_eq!(updates[2].current_file, "c.bag");
    }

    #[test]
    fn test_cancel_between_files_skips_rest() {
        let names = ["a.bag", "b.bag", "c.bag", "d.bag"];
        let dir = workdir_with(&names);
        let job = ConversionJob::new("unused", dir.path(), names);
        let token = CancelToken::new();
        // Cancel while the image pass of the second file is running.
        let converter = FakeConverter {
            cancel_after: Some((4, token.clone())),
            ..FakeConverter::default()
        };
        let mut events: Vec<ConversionEvent> = Vec::new();

        let summary = run_job(&job, &converter, &token, &mut events);

        assert!(summary.cancelled);
        assert_eq!((summary.succeeded, summary.failed, summary.skipped), (2, 0, 2));
        assert_eq!(summary.records[2].outcome, ConversionOutcome::Skipped);
        assert_eq!(summary.records[3].file_name, "d.bag");
        assert_eq!(converter.calls.lock().unwrap().len(), 4);
        assert!(matches!(events.last(), Some(ConversionEvent::RunCancelled(_))));
        assert!(!events
            .iter()
            .any(|e| matches!(e, ConversionEvent::FileStarted(n) if n == "c.bag")));
    }

    #[test]
    fn test_cancel_before_start_skips_everything() {
        let job = ConversionJob::new("unused", "/nonexistent", ["a.bag", "b.bag"]);
        let token = CancelToken::new();
        token.cancel();
        let mut events: Vec<ConversionEvent> = Vec::new();

        let summary = run_job(&job, &FakeConverter::default(), &token, &mut events);

        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.attempted, 0);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_missing_source_is_filesystem_failure() {
        let dir = TempDir::new().unwrap();
        let job = ConversionJob::new("unused", dir.path(), ["ghost.bag"]);
        let converter = FakeConverter::default();
        let mut events: Vec<ConversionEvent> = Vec::new();

        let summary = run_job(&job, &converter, &CancelToken::new(), &mut events);

        assert_eq!(summary.failed, 1);
        assert!(converter.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_image_only_selection() {
        let dir = workdir_with(&["a.bag"]);
        let job = ConversionJob::new("unused", dir.path(), ["a.bag"])
            .with_extraction(ExtractionSelection::ImageOnly);
        let converter = FakeConverter {
            failing: vec![ConvertMode::PointCloud],
            ..FakeConverter::default()
        };
        let mut events: Vec<ConversionEvent> = Vec::new();

        let summary = run_job(&job, &converter, &CancelToken::new(), &mut events);

        assert_eq!(summary.succeeded, 1);
        assert_eq!(converter.calls.lock().unwrap()[0].2, ConvertMode::Image);
        assert!(!dir.path().join("a/a_ply").exists());
    }

    #[test]
    fn test_empty_job_completes() {
        let job = ConversionJob::new("unused", "/nonexistent", Vec::<String>::new());
        let mut events: Vec<ConversionEvent> = Vec::new();

        let summary = run_job(&job, &FakeConverter::default(), &CancelToken::new(), &mut events);

        assert_eq!(summary, RunSummary::from_records(Vec::new(), summary.elapsed, false));
        assert!(matches!(events.as_slice(), [ConversionEvent::RunCompleted(_)]));
    }
}
