//! Per-file outcomes and the end-of-run summary.

use std::fmt::Display;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::layout::ConvertMode;

/// Terminal result for one file of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConversionOutcome {
    /// Every selected mode converted successfully.
    Success,
    /// At least one step failed; the reason is human-readable.
    Failure(String),
    /// Not processed because the run was cancelled first.
    Skipped,
}

impl ConversionOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success)
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, ConversionOutcome::Failure(_))
    }
}

/// Results of the individual extraction modes for one file.
///
/// The modes are independent: a failed point-cloud pass does not prevent
/// the image pass, and both results are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModeResults {
    /// `None` when the mode was not selected.
    pub point_cloud: Option<Result<(), String>>,
    /// `None` when the mode was not selected.
    pub image: Option<Result<(), String>>,
}

impl ModeResults {
    /// Store the result of running `mode`.
    pub fn record<E: Display>(&mut self, mode: ConvertMode, result: Result<(), E>) {
        let result = result.map_err(|e| e.to_string());
        match mode {
            ConvertMode::PointCloud => self.point_cloud = Some(result),
            ConvertMode::Image => self.image = Some(result),
        }
    }

    /// Result for `mode`, if it ran.
    #[must_use]
    pub fn get(&self, mode: ConvertMode) -> Option<&Result<(), String>> {
        match mode {
            ConvertMode::PointCloud => self.point_cloud.as_ref(),
            ConvertMode::Image => self.image.as_ref(),
        }
    }

    /// Combine the mode results into a single outcome.
    ///
    /// Failure reasons of both modes are joined when both failed.
    #[must_use]
    pub fn outcome(&self) -> ConversionOutcome {
        let reasons: Vec<String> = ConvertMode::ALL
            .iter()
            .filter_map(|&mode| match self.get(mode) {
                Some(Err(reason)) => Some(format!("{mode}: {reason}")),
                _ => None,
            })
            .collect();
        if reasons.is_empty() {
            ConversionOutcome::Success
        } else {
            ConversionOutcome::Failure(reasons.join("; "))
        }
    }
}

/// Outcome of one file, tagged with its name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileRecord {
    pub file_name: String,
    pub outcome: ConversionOutcome,
}

impl FileRecord {
    pub fn new(file_name: impl Into<String>, outcome: ConversionOutcome) -> Self {
        Self {
            file_name: file_name.into(),
            outcome,
        }
    }
}

/// Summary reported once at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunSummary {
    /// Files that were processed (succeeded + failed).
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    /// Whether the run ended because of cancellation.
    pub cancelled: bool,
    /// Per-file records in job order, skipped files included.
    pub records: Vec<FileRecord>,
}

impl RunSummary {
    /// Build a summary by counting `records`.
    #[must_use]
    pub fn from_records(records: Vec<FileRecord>, elapsed: Duration, cancelled: bool) -> Self {
        let mut summary = Self {
            elapsed,
            cancelled,
            ..Self::default()
        };
        for record in &records {
            match record.outcome {
                ConversionOutcome::Success => summary.succeeded += 1,
                ConversionOutcome::Failure(_) => summary.failed += 1,
                ConversionOutcome::Skipped => summary.skipped += 1,
            }
        }
        summary.attempted = summary.succeeded + summary.failed;
        summary.records = records;
        summary
    }

    /// Records of the files that failed.
    pub fn failures(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|r| r.outcome.is_failure())
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded, {} failed, {} skipped in {:.1}s",
            self.attempted,
            self.succeeded,
            self.failed,
            self.skipped,
            self.elapsed.as_secs_f64()
        )
    }
}
