//! Input discovery and loading.
//!
//! Expands the paths given on the command line into image files, identifies
//! each one through the [`ImageBackend`], and adds it to the [`Session`].
//!
//! ## Rules
//!
//! - A file argument is taken as-is if its extension is supported.
//! - A directory argument is walked recursively; files inside are visited in
//!   file-name order per directory, hidden entries (`.name`) are skipped.
//! - Files that cannot be read, decoded, or that report a zero size are
//!   skipped and reported; loading continues with the next file.
//! - A missing input path is an error: the user almost certainly mistyped it.

use crate::imaging::{ImageBackend, is_supported_image};
use crate::session::{NewImage, Session};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// A file that was found but not added to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Expand `inputs` into the ordered list of candidate image files.
pub fn discover_images(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, LoadError> {
    let mut found = Vec::new();

    for input in inputs {
        let metadata = std::fs::metadata(input)?;
        if metadata.is_file() {
            if is_supported_image(input) {
                found.push(input.clone());
            } else {
                debug!("ignoring {}: unsupported extension", input.display());
            }
            continue;
        }

        let walker = WalkDir::new(input)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
        for entry in walker {
            let entry = entry.map_err(|source| LoadError::Walk {
                path: input.clone(),
                source,
            })?;
            if entry.file_type().is_file() && is_supported_image(entry.path()) {
                found.push(entry.into_path());
            }
        }
    }

    Ok(found)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

/// Load every image under `inputs` into `session`.
pub fn load_images(
    backend: &impl ImageBackend,
    session: &mut Session,
    inputs: &[PathBuf],
) -> Result<LoadSummary, LoadError> {
    let mut summary = LoadSummary::default();

    for path in discover_images(inputs)? {
        match load_one(backend, session, &path) {
            Ok(()) => summary.loaded += 1,
            Err(reason) => {
                warn!("skipping {}: {}", path.display(), reason);
                summary.skipped.push(SkippedFile { path, reason });
            }
        }
    }

    Ok(summary)
}

fn load_one(
    backend: &impl ImageBackend,
    session: &mut Session,
    path: &Path,
) -> Result<(), String> {
    let data = std::fs::read(path).map_err(|e| e.to_string())?;
    let dimensions = backend.identify(&data).map_err(|e| e.to_string())?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    session
        .add_image(NewImage {
            name,
            source: path.to_path_buf(),
            byte_size: data.len() as u64,
            dimensions,
        })
        .map_err(|e| e.to_string())?;

    debug!(
        "loaded {} ({}x{})",
        path.display(),
        dimensions.width,
        dimensions.height
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Dimensions;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::marker_files;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    // =========================================================================
    // discover_images
    // =========================================================================

    #[test]
    fn directory_walk_is_sorted_and_filtered() {
        let tmp = marker_files(&["c.jpg", "a.png", "notes.txt", "b.JPEG"]);
        let found = discover_images(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(names(&found), vec!["a.png", "b.JPEG", "c.jpg"]);
    }

    #[test]
    fn directory_walk_recurses_and_skips_hidden() {
        let tmp = marker_files(&["a.jpg", "sub/b.jpg", ".thumbs/c.jpg", ".hidden.jpg"]);
        let found = discover_images(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(names(&found), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn explicit_files_keep_argument_order() {
        let tmp = marker_files(&["a.jpg", "b.jpg", "readme.md"]);
        let found = discover_images(&[
            tmp.path().join("b.jpg"),
            tmp.path().join("readme.md"),
            tmp.path().join("a.jpg"),
        ])
        .unwrap();
        assert_eq!(names(&found), vec!["b.jpg", "a.jpg"]);
    }

    #[test]
    fn missing_input_is_an_error() {
        let tmp = marker_files(&[]);
        let result = discover_images(&[tmp.path().join("nope")]);
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    // =========================================================================
    // load_images
    // =========================================================================

    #[test]
    fn loads_identified_images_in_order() {
        let tmp = marker_files(&["a.jpg", "b.jpg"]);
        let a = tmp.path().join("a.jpg");
        let backend = MockBackend::with_dimensions(vec![
            ("a.jpg", Dimensions::new(1600, 1200)),
            ("b.jpg", Dimensions::new(800, 800)),
        ]);
        let mut session = Session::default();

        let summary = load_images(&backend, &mut session, &[tmp.path().to_path_buf()]).unwrap();

        assert_eq!(summary.loaded, 2);
        assert!(summary.skipped.is_empty());
        let entries = session.entries();
        assert_eq!(entries[0].name, "a.jpg");
        assert_eq!(entries[0].source, a);
        assert_eq!(entries[0].byte_size, 5);
        assert_eq!(entries[1].dimensions, Dimensions::new(800, 800));
        assert_eq!(session.active_index(), Some(0));
    }

    #[test]
    fn undecodable_and_zero_size_files_are_skipped() {
        let tmp = marker_files(&["a.jpg", "broken.jpg", "empty.png"]);
        let backend = MockBackend::with_dimensions(vec![
            ("a.jpg", Dimensions::new(100, 100)),
            ("empty.png", Dimensions::new(0, 0)),
        ]);
        let mut session = Session::default();

        let summary = load_images(&backend, &mut session, &[tmp.path().to_path_buf()]).unwrap();

        assert_eq!(summary.loaded, 1);
        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(names(&[summary.skipped[0].path.clone()]), vec!["broken.jpg"]);
        assert!(summary.skipped[0].reason.contains("Decode"));
        assert!(summary.skipped[1].reason.contains("zero size"));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn nothing_loadable_leaves_session_empty() {
        let tmp = marker_files(&["notes.txt"]);
        let backend = MockBackend::new();
        let mut session = Session::default();

        let summary = load_images(&backend, &mut session, &[tmp.path().to_path_buf()]).unwrap();

        assert_eq!(summary.loaded, 0);
        assert!(summary.skipped.is_empty());
        assert_eq!(session.active_index(), None);
    }
}
