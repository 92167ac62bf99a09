//! Reads a local folder into upload entries.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::TutorError;
use crate::models::FileEntry;

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Collect every text file under `dir`.
///
/// Paths are prefixed with the folder's own name (`project/src/main.py`), the
/// way a browser folder picker reports them. Hidden files and directories are
/// skipped, as are files that are not valid UTF-8.
pub fn read_folder(dir: &Path) -> Result<Vec<FileEntry>, TutorError> {
    if !dir.is_dir() {
        return Err(TutorError::read(dir.display(), "not a directory"));
    }
    let folder_name = dir
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".to_string());

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_entry(|e| !is_hidden(e)) {
        let entry = entry.map_err(|e| TutorError::read(dir.display(), e))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| TutorError::read(entry.path().display(), e))?;
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let bytes = std::fs::read(entry.path())
            .map_err(|e| TutorError::read(entry.path().display(), e))?;
        match String::from_utf8(bytes) {
            Ok(content) => entries.push(FileEntry::new(
                format!("{}/{}", folder_name, relative),
                content,
            )),
            Err(_) => {
                tracing::warn!("Skipping non-text file: {}", entry.path().display());
            }
        }
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::info!("Read {} files from {}", entries.len(), dir.display());
    Ok(entries)
}
