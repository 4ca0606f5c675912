//! Capture discovery.

use std::path::Path;

use bagconv_core::CAPTURE_EXTENSION;

use crate::error::{Error, Result};

/// List capture file names directly inside `dir`, sorted by name.
///
/// Only regular files ending in `.bag` are returned; subdirectories are not
/// searched, so the per-capture output trees of earlier runs are ignored.
/// Names that are not valid UTF-8 are skipped.
///
/// # Errors
/// Returns [`Error::Filesystem`] if the directory cannot be read.
pub fn scan_captures(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::fs(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::fs(dir, e))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.len() > CAPTURE_EXTENSION.len()
            && name.ends_with(CAPTURE_EXTENSION)
            && entry.path().is_file()
        {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_lists_sorted_captures() {
        let dir = TempDir::new().unwrap();
        for name in ["b.bag", "a.bag", "notes.txt", ".bag", "c.bag.tmp"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("d.bag")).unwrap();

        let names = scan_captures(dir.path()).unwrap();
        assert_eq!(names, ["a.bag", "b.bag"]);
    }

    #[test]
    fn test_scan_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = scan_captures(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::Filesystem { .. }));
    }
}
