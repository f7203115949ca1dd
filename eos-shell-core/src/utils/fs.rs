//! Filesystem Utilities.
//!
//! Helpers for the file operations the shell layers perform: ensuring a
//! directory exists, reading and atomically writing text files, and listing
//! the files of a directory asynchronously. Every function maps
//! `std::io::Error` into [`CoreError::Filesystem`] with the offending path.

use crate::error::CoreError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn fs_error(message: &str, path: &Path, source: std::io::Error) -> CoreError {
    CoreError::Filesystem {
        message: message.to_string(),
        path: path.to_path_buf(),
        source,
    }
}

/// Ensures that a directory exists at the given path.
///
/// Missing parents are created. If the path exists but is not a directory,
/// an error is returned.
///
/// # Examples
///
/// ```no_run
/// # use eos_shell_core::utils::fs::ensure_dir_exists;
/// # use tempfile::tempdir;
/// let temp_dir = tempdir().unwrap();
/// let dir_path = temp_dir.path().join("eos-shell");
/// ensure_dir_exists(&dir_path).unwrap();
/// assert!(dir_path.is_dir());
/// ```
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if !path.is_dir() {
            Err(fs_error(
                "Path exists but is not a directory",
                path,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "Path exists but is not a directory"),
            ))
        } else {
            Ok(())
        }
    } else {
        fs::create_dir_all(path).map_err(|e| fs_error("Failed to create directory", path, e))
    }
}

/// Reads the entire contents of a file into a string.
pub fn read_to_string(path: &Path) -> Result<String, CoreError> {
    fs::read_to_string(path).map_err(|e| fs_error("Failed to read file to string", path, e))
}

/// Writes `content` to `path` atomically.
///
/// The data goes to a sibling temporary file first which is then renamed over
/// the destination, so readers never observe a half-written file. Parent
/// directories are created as needed.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir_exists(parent)?;
        }
    }

    let tmp_path = temp_sibling(path);
    {
        let mut file = fs::File::create(&tmp_path)
            .map_err(|e| fs_error("Failed to create temporary file", &tmp_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| fs_error("Failed to write temporary file", &tmp_path, e))?;
        file.sync_all()
            .map_err(|e| fs_error("Failed to sync temporary file", &tmp_path, e))?;
    }
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        fs_error("Failed to move temporary file into place", path, e)
    })
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Removes the file at `path`. Returns `Ok(false)` if it did not exist.
pub fn remove_file_if_exists(path: &Path) -> Result<bool, CoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(fs_error("Failed to remove file", path, e)),
    }
}

/// Asynchronously reads a file into a string.
pub async fn read_to_string_async(path: &Path) -> Result<String, CoreError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| fs_error("Failed to read file to string", path, e))
}

/// Lists the regular files in `dir` whose extension equals `extension`.
///
/// The result is sorted by path so callers get a stable order regardless of
/// the directory's on-disk ordering. A missing directory yields an empty list.
pub async fn list_files_async(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, CoreError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(fs_error("Failed to read directory", dir, e)),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| fs_error("Failed to read directory entry", dir, e))?
    {
        let path = entry.path();
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file && path.extension().and_then(|s| s.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
