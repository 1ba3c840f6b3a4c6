//! Photo folder scanning.
//!
//! Collects every supported image in a folder and reads it into memory as a
//! [`SourceFile`]. Nothing is decoded here: a file with the right extension but
//! broken content is still returned, and the album builder skips it later.
//!
//! ```text
//! photos/
//! ├── album.toml          # Config (optional, not an image)
//! ├── IMG_0001.JPG        # Included (extensions are case-insensitive)
//! ├── IMG_0002.png
//! ├── .IMG_0003.jpg       # Hidden: ignored
//! ├── notes.txt           # Unsupported: ignored
//! └── 2023/               # Only with --recursive
//!     └── beach.tiff      # Named "2023/beach.tiff"
//! ```
//!
//! Files are returned sorted by their name relative to the folder. Reports use
//! that name; the printed label drops the folder part.

use crate::imaging::{SourceFile, is_supported_image};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Photo folder not found: {0}")]
    NotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Failed to walk photo folder: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Read all supported images in `dir`, sorted by relative name.
///
/// Only the top level is read unless `recursive` is set.
pub fn scan_folder(dir: &Path, recursive: bool) -> Result<Vec<SourceFile>, ScanError> {
    if !dir.exists() {
        return Err(ScanError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut found: Vec<(String, PathBuf)> = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_supported_image(entry.path()) {
            continue;
        }
        found.push((relative_name(dir, entry.path()), entry.into_path()));
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));

    found
        .into_iter()
        .map(|(name, path)| Ok(SourceFile::new(name, fs::read(&path)?)))
        .collect()
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// `path` relative to `root`, `/`-separated on every platform.
fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str, content: &[u8]) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn names(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.filename.as_str()).collect()
    }

    #[test]
    fn missing_folder_is_not_found() {
        let result = scan_folder(Path::new("/nonexistent/photos"), false);
        assert!(matches!(result, Err(ScanError::NotFound(_))));
    }

    #[test]
    fn file_instead_of_folder() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.jpg", b"x");
        let result = scan_folder(&tmp.path().join("a.jpg"), false);
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn empty_folder_is_empty_list() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_folder(tmp.path(), false).unwrap().is_empty());
    }

    #[test]
    fn only_supported_extensions_sorted() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "b.png", b"b");
        touch(tmp.path(), "a.JPG", b"a");
        touch(tmp.path(), "c.tiff", b"c");
        touch(tmp.path(), "notes.txt", b"n");
        touch(tmp.path(), "album.toml", b"");
        touch(tmp.path(), "clip.mov", b"m");

        let files = scan_folder(tmp.path(), false).unwrap();
        assert_eq!(names(&files), vec!["a.JPG", "b.png", "c.tiff"]);
        assert_eq!(files[0].bytes, b"a");
    }

    #[test]
    fn hidden_files_ignored() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), ".hidden.jpg", b"h");
        touch(tmp.path(), "._resource.jpg", b"r");
        touch(tmp.path(), "shown.jpg", b"s");
        assert_eq!(names(&scan_folder(tmp.path(), false).unwrap()), vec!["shown.jpg"]);
    }

    #[test]
    fn hidden_root_folder_is_still_scanned() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join(".photos");
        touch(&root, "a.jpg", b"a");
        assert_eq!(names(&scan_folder(&root, false).unwrap()), vec!["a.jpg"]);
    }

    #[test]
    fn subfolders_skipped_unless_recursive() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "top.jpg", b"t");
        touch(tmp.path(), "2023/beach.tiff", b"b");
        touch(tmp.path(), "2023/deep/x.bmp", b"x");
        touch(tmp.path(), ".cache/skip.jpg", b"s");

        let flat = scan_folder(tmp.path(), false).unwrap();
        assert_eq!(names(&flat), vec!["top.jpg"]);

        let all = scan_folder(tmp.path(), true).unwrap();
        assert_eq!(
            names(&all),
            vec!["2023/beach.tiff", "2023/deep/x.bmp", "top.jpg"]
        );
    }

    #[test]
    fn directory_with_image_extension_is_not_a_file() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("folder.jpg")).unwrap();
        assert!(scan_folder(tmp.path(), false).unwrap().is_empty());
    }
}
