//! External converter invocation.
//!
//! The converter is an opaque executable taking the mode flag first:
//!
//! ```text
//! <exe> -l <input.bag> <output_dir>   # point clouds
//! <exe> -p <input.bag> <output_dir>   # images
//! ```
//!
//! Exit status 0 means success; anything else is a failure whose stderr is
//! kept for diagnostics. Output files are never inspected.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use bagconv_core::ConvertMode;
use log::debug;
use thiserror::Error;

/// Failure of a single converter invocation.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The executable could not be started (missing, not executable, ...).
    #[error("failed to launch converter {}: {source}", .executable.display())]
    Launch {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converter ran but reported failure.
    #[error("{mode} extraction failed ({}): {}", exit_description(.code), stderr_or_placeholder(.stderr))]
    Failed {
        mode: ConvertMode,
        /// Exit code; `None` if the process was terminated by a signal.
        code: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

impl ConvertError {
    /// Whether the converter could not be started at all.
    #[must_use]
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, ConvertError::Launch { .. })
    }
}

#[allow(clippy::ref_option)]
fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn stderr_or_placeholder(stderr: &str) -> &str {
    if stderr.is_empty() {
        "no diagnostic output"
    } else {
        stderr
    }
}

/// Runs one extraction pass for a capture.
///
/// Implementations must be `Send` so a worker thread can own them.
pub trait Converter: Send {
    /// Extract `mode` artifacts from `input` into `output_dir`.
    ///
    /// # Errors
    /// Returns [`ConvertError`] if the converter cannot be launched or
    /// reports failure.
    fn convert(
        &self,
        input: &Path,
        output_dir: &Path,
        mode: ConvertMode,
    ) -> Result<(), ConvertError>;
}

/// Converter backed by an external executable.
#[derive(Debug, Clone)]
pub struct ExternalConverter {
    executable: PathBuf,
}

impl ExternalConverter {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Argument list passed to the executable.
    #[must_use]
    pub fn args(input: &Path, output_dir: &Path, mode: ConvertMode) -> Vec<OsString> {
        vec![
            OsString::from(mode.flag()),
            input.as_os_str().to_owned(),
            output_dir.as_os_str().to_owned(),
        ]
    }
}

impl Converter for ExternalConverter {
    fn convert(
        &self,
        input: &Path,
        output_dir: &Path,
        mode: ConvertMode,
    ) -> Result<(), ConvertError> {
        let args = Self::args(input, output_dir, mode);
        debug!("running {} {:?}", self.executable.display(), args);

        let output = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ConvertError::Launch {
                executable: self.executable.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }
        Err(ConvertError::Failed {
            mode,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
