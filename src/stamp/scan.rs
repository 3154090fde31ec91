//! Directory enumeration for the dispatcher
//!
//! Lists the immediate entries of the target directory (non-recursive)
//! and keeps regular files with a JPEG extension, matched
//! case-insensitively. A failure to list the directory itself is fatal;
//! a failure to stat an individual entry only skips that entry.

use crate::error::{Result, StamperError};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Check if a path carries a JPEG extension (case-insensitive)
pub fn has_jpeg_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}

/// Enumerate eligible JPEG files in a directory
///
/// Returns the full paths of all regular files whose name ends in `.jpg`
/// or `.jpeg`. Subdirectories are not descended into.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| StamperError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();

        if !has_jpeg_extension(&path) {
            continue;
        }

        // Follows symlinks, so a link to a regular JPEG counts
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => {
                debug!(path = %path.display(), "Skipping non-regular entry");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping entry that failed to stat");
            }
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::File::create(path).unwrap();
    }

    #[test]
    fn test_jpeg_extension_matching() {
        assert!(has_jpeg_extension(Path::new("a.jpg")));
        assert!(has_jpeg_extension(Path::new("b.JPG")));
        assert!(has_jpeg_extension(Path::new("c.Jpeg")));
        assert!(!has_jpeg_extension(Path::new("c.png")));
        assert!(!has_jpeg_extension(Path::new("notes.txt")));
        assert!(!has_jpeg_extension(Path::new("jpg")));
        assert!(!has_jpeg_extension(Path::new("archive.jpg.bak")));
    }

    #[test]
    fn test_scan_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("b.JPG"));
        touch(&dir.path().join("c.png"));
        touch(&dir.path().join("notes.txt"));

        let mut files = scan_directory(dir.path()).unwrap();
        files.sort();

        assert_eq!(files, vec![dir.path().join("a.jpg"), dir.path().join("b.JPG")]);
    }

    #[test]
    fn test_scan_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();
        touch(&dir.path().join("nested.jpg").join("inner.jpg"));
        touch(&dir.path().join("real.jpg"));

        let files = scan_directory(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("real.jpg")]);
    }

    #[test]
    fn test_scan_empty_of_jpegs() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("readme.md"));

        let files = scan_directory(dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let err = scan_directory(Path::new("/no/such/directory")).unwrap_err();
        assert!(matches!(err, StamperError::ReadDir { .. }));
    }
}
