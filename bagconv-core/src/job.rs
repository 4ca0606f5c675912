//! Conversion job description.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::layout::ConvertMode;

/// Which artifacts to extract from each capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExtractionSelection {
    /// Point clouds and images.
    #[default]
    Both,
    /// Point clouds only.
    PointCloudOnly,
    /// Images only.
    ImageOnly,
}

impl ExtractionSelection {
    /// Modes to run for each file, in execution order.
    #[must_use]
    pub fn modes(self) -> &'static [ConvertMode] {
        match self {
            ExtractionSelection::Both => &ConvertMode::ALL,
            ExtractionSelection::PointCloudOnly => &[ConvertMode::PointCloud],
            ExtractionSelection::ImageOnly => &[ConvertMode::Image],
        }
    }

    /// Whether `mode` is part of this selection.
    #[must_use]
    pub fn includes(self, mode: ConvertMode) -> bool {
        self.modes().contains(&mode)
    }
}

impl std::fmt::Display for ExtractionSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionSelection::Both => write!(f, "point clouds and images"),
            ExtractionSelection::PointCloudOnly => write!(f, "point clouds"),
            ExtractionSelection::ImageOnly => write!(f, "images"),
        }
    }
}

/// An immutable description of one conversion run.
///
/// File names are kept in selection order; duplicates are dropped so each
/// capture is converted at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConversionJob {
    executable: PathBuf,
    working_dir: PathBuf,
    source_dir: Option<PathBuf>,
    file_names: Vec<String>,
    extraction: ExtractionSelection,
}

impl ConversionJob {
    /// Create a job converting `file_names` found in `working_dir`.
    pub fn new<I, S>(
        executable: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
        file_names: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let file_names = file_names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .collect();
        Self {
            executable: executable.into(),
            working_dir: working_dir.into(),
            source_dir: None,
            file_names,
            extraction: ExtractionSelection::default(),
        }
    }

    /// Read captures from `dir` instead of the working directory.
    #[must_use]
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    /// Restrict the artifacts extracted per file.
    #[must_use]
    pub fn with_extraction(mut self, extraction: ExtractionSelection) -> Self {
        self.extraction = extraction;
        self
    }

    /// Path of the external converter.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Root of the output tree.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Directory holding the input captures.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        self.source_dir.as_deref().unwrap_or(&self.working_dir)
    }

    /// Full path of an input capture.
    #[must_use]
    pub fn source_path(&self, file_name: &str) -> PathBuf {
        self.source_dir().join(file_name)
    }

    /// Selected file names in order.
    #[must_use]
    pub fn file_names(&self) -> &[String] {
        &self.file_names
    }

    /// Number of files in the job.
    #[must_use]
    pub fn len(&self) -> usize {
        self.file_names.len()
    }

    /// Whether the job has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file_names.is_empty()
    }

    /// Artifacts to extract.
    #[must_use]
    pub fn extraction(&self) -> ExtractionSelection {
        self.extraction
    }
}
