//! Output tree preparation.
//!
//! Both operations are overwrite-idempotent: existing directories are kept
//! and an existing capture copy is replaced.

use std::path::Path;

use bagconv_core::{ExtractionSelection, FileOutputLayout};
use log::debug;

use crate::error::{Error, Result};

/// Create the capture's root directory and one output directory per
/// selected mode.
///
/// # Errors
/// Returns [`Error::Filesystem`] naming the directory that could not be
/// created.
pub fn prepare_output_dirs(layout: &FileOutputLayout, selection: ExtractionSelection) -> Result<()> {
    create_dir(&layout.root_dir)?;
    for &mode in selection.modes() {
        create_dir(layout.output_dir(mode))?;
    }
    Ok(())
}

fn create_dir(path: &Path) -> Result<()> {
    debug!("creating {}", path.display());
    std::fs::create_dir_all(path).map_err(|e| Error::fs(path, e))
}

/// Copy the original capture to `layout.bag_copy_path`.
///
/// Returns the number of bytes copied; `0` if `source` already is the copy.
///
/// # Errors
/// Returns [`Error::Filesystem`] if the source cannot be read or the copy
/// cannot be written.
pub fn copy_capture(source: &Path, layout: &FileOutputLayout) -> Result<u64> {
    let target = &layout.bag_copy_path;
    if is_same_file(source, target) {
        debug!("{} already in place", target.display());
        return Ok(0);
    }
    debug!("copying {} -> {}", source.display(), target.display());
    std::fs::copy(source, target).map_err(|e| Error::fs(source, e))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bagconv_core::plan;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let layout = plan(dir.path(), "scene.bag").unwrap();

        prepare_output_dirs(&layout, ExtractionSelection::Both).unwrap();
        prepare_output_dirs(&layout, ExtractionSelection::Both).unwrap();

        assert!(dir.path().join("scene/scene_ply/ply").is_dir());
        assert!(dir.path().join("scene/scene_png/png").is_dir());
    }

    #[test]
    fn test_prepare_only_selected_modes() {
        let dir = TempDir::new().unwrap();
        let layout = plan(dir.path(), "scene.bag").unwrap();

        prepare_output_dirs(&layout, ExtractionSelection::ImageOnly).unwrap();

        assert!(layout.png_output_dir.is_dir());
        assert!(!dir.path().join("scene/scene_ply").exists());
    }

    #[test]
    fn test_prepare_fails_when_root_is_a_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("scene"), b"not a dir").unwrap();
        let layout = plan(dir.path(), "scene.bag").unwrap();

        let err = prepare_output_dirs(&layout, ExtractionSelection::Both).unwrap_err();
        assert!(matches!(err, Error::Filesystem { .. }));
    }

    #[test]
    fn test_copy_overwrites_previous_copy() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("scene.bag");
        std::fs::write(&source, b"new capture").unwrap();
        let layout = plan(dir.path(), "scene.bag").unwrap();
        prepare_output_dirs(&layout, ExtractionSelection::Both).unwrap();
        std::fs::write(&layout.bag_copy_path, b"stale").unwrap();

        let copied = copy_capture(&source, &layout).unwrap();

        assert_eq!(copied, 11);
        assert_eq!(std::fs::read(&layout.bag_copy_path).unwrap(), b"new capture");
    }

    #[test]
    fn test_copy_onto_itself_is_noop() {
        let dir = TempDir::new().unwrap();
        let layout = plan(dir.path(), "scene.bag").unwrap();
        prepare_output_dirs(&layout, ExtractionSelection::Both).unwrap();
        std::fs::write(&layout.bag_copy_path, b"capture").unwrap();

        let copied = copy_capture(&layout.bag_copy_path, &layout).unwrap();

        assert_eq!(copied, 0);
        assert_eq!(std::fs::read(&layout.bag_copy_path).unwrap(), b"capture");
    }

    #[test]
    fn test_copy_missing_source() {
        let dir = TempDir::new().unwrap();
        let layout = plan(dir.path(), "scene.bag").unwrap();
        prepare_output_dirs(&layout, ExtractionSelection::Both).unwrap();

        let err = copy_capture(&dir.path().join("scene.bag"), &layout).unwrap_err();
        assert!(err.to_string().contains("scene.bag"));
    }
}
