//! Output layout planning.
//!
//! Maps a capture file name to the directory tree its derived artifacts
//! are written into:
//!
//! ```text
//! <working_dir>/NAME/NAME.bag
//! <working_dir>/NAME/NAME_ply/ply/
//! <working_dir>/NAME/NAME_png/png/
//! ```
//!
//! Planning is pure; creating the directories is the caller's job.

use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File extension (including the dot) every capture file must carry.
pub const CAPTURE_EXTENSION: &str = ".bag";

/// Extraction mode understood by the external converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConvertMode {
    /// 3D point-cloud frames (`.ply`).
    PointCloud,
    /// 2D image frames (`.png`).
    Image,
}

impl ConvertMode {
    /// Both modes, in the order they are run for each file.
    pub const ALL: [ConvertMode; 2] = [ConvertMode::PointCloud, ConvertMode::Image];

    /// Command-line flag selecting this mode on the converter.
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            ConvertMode::PointCloud => "-l",
            ConvertMode::Image => "-p",
        }
    }

    /// Artifact extension, also used to name the output directories.
    #[must_use]
    pub fn artifact_ext(self) -> &'static str {
        match self {
            ConvertMode::PointCloud => "ply",
            ConvertMode::Image => "png",
        }
    }
}

impl std::fmt::Display for ConvertMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertMode::PointCloud => write!(f, "point cloud"),
            ConvertMode::Image => write!(f, "image"),
        }
    }
}

/// Directory layout derived from `(working_dir, file_name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileOutputLayout {
    /// File name without the capture extension.
    pub base_name: String,
    /// `<working_dir>/NAME`.
    pub root_dir: PathBuf,
    /// `<working_dir>/NAME/NAME.bag`.
    pub bag_copy_path: PathBuf,
    /// `<working_dir>/NAME/NAME_ply/ply`.
    pub ply_output_dir: PathBuf,
    /// `<working_dir>/NAME/NAME_png/png`.
    pub png_output_dir: PathBuf,
}

impl FileOutputLayout {
    /// Output directory for the given mode.
    #[must_use]
    pub fn output_dir(&self, mode: ConvertMode) -> &Path {
        match mode {
            ConvertMode::PointCloud => &self.ply_output_dir,
            ConvertMode::Image => &self.png_output_dir,
        }
    }
}

/// Plan the output layout for one capture file.
///
/// `file_name` must be a bare file name ending in [`CAPTURE_EXTENSION`]
/// with a non-empty stem.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if the name contains a path separator,
/// lacks the capture extension, or has an empty (or `.`/`..`) stem.
pub fn plan(working_dir: &Path, file_name: &str) -> Result<FileOutputLayout> {
    if file_name.contains(['/', '\\']) {
        return Err(Error::invalid_input(
            file_name,
            "expected a file name, not a path",
        ));
    }
    let Some(base_name) = file_name.strip_suffix(CAPTURE_EXTENSION) else {
        return Err(Error::invalid_input(
            file_name,
            format!("missing {CAPTURE_EXTENSION} extension"),
        ));
    };
    if base_name.is_empty() || base_name == "." || base_name == ".." {
        return Err(Error::invalid_input(file_name, "empty base name"));
    }

    let root_dir = working_dir.join(base_name);
    let mode_dir = |mode: ConvertMode| {
        let ext = mode.artifact_ext();
        root_dir.join(format!("{base_name}_{ext}")).join(ext)
    };

    Ok(FileOutputLayout {
        base_name: base_name.to_string(),
        bag_copy_path: root_dir.join(file_name),
        ply_output_dir: mode_dir(ConvertMode::PointCloud),
        png_output_dir: mode_dir(ConvertMode::Image),
        root_dir,
    })
}
