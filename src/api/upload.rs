//! Validation and decoding of uploaded files.

use std::path::Path;

use crate::models::{UploadStatus, UploadedFile};

/// Extensions the upload endpoint accepts, lower-case with leading dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".txt", ".py", ".js", ".jsx", ".ts", ".tsx", ".html", ".css", ".json", ".yml", ".yaml", ".md",
    ".rst", ".ini", ".conf", ".sh",
];

pub const MAX_FILES_PER_REQUEST: usize = 10;
pub const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

const TYPE_NOT_ALLOWED: &str = "File type not allowed";
const TOO_LARGE: &str = "File too large to process";
const NOT_TEXT: &str = "File appears to be binary or encoded in an unsupported format";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_size: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: MAX_FILES_PER_REQUEST,
            max_file_size: MAX_FILE_SIZE_BYTES,
        }
    }
}

impl UploadLimits {
    /// Largest request body the upload route should accept.
    pub fn body_limit(&self) -> usize {
        let files = self.max_files as u64 * self.max_file_size;
        (files + 1024 * 1024) as usize
    }
}

/// A bare file name: no separators, no parent references.
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains('/')
        && !filename.contains('\\')
}

pub fn is_allowed_file_type(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or(false)
}

/// Classify one file: wrong type, too large, not text, or accepted.
pub fn process_file(filename: &str, bytes: &[u8], limits: &UploadLimits) -> UploadedFile {
    let size = bytes.len() as u64;
    let outcome = |status, content: &str| UploadedFile {
        filename: filename.to_string(),
        content: content.to_string(),
        size,
        status,
    };

    if !is_allowed_file_type(filename) {
        return outcome(UploadStatus::Error, TYPE_NOT_ALLOWED);
    }
    if size > limits.max_file_size {
        return outcome(UploadStatus::Skipped, TOO_LARGE);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => outcome(UploadStatus::Success, text),
        Err(_) => outcome(UploadStatus::Error, NOT_TEXT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_paths_in_filenames() {
        assert!(is_safe_filename("main.py"));
        assert!(!is_safe_filename("../main.py"));
        assert!(!is_safe_filename("src/main.py"));
        assert!(!is_safe_filename("src\\main.py"));
        assert!(!is_safe_filename(""));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_allowed_file_type("README.MD"));
        assert!(is_allowed_file_type("app.tsx"));
        assert!(!is_allowed_file_type("image.png"));
        assert!(!is_allowed_file_type(".bashrc"));
        assert!(!is_allowed_file_type("Makefile"));
    }

    #[test]
    fn type_check_runs_before_size_check() {
        let limits = UploadLimits {
            max_files: 1,
            max_file_size: 2,
        };
        let file = process_file("blob.bin", b"abcdef", &limits);
        assert_eq!(file.status, UploadStatus::Error);
        assert_eq!(file.content, TYPE_NOT_ALLOWED);
    }

    #[test]
    fn oversized_files_are_skipped() {
        let limits = UploadLimits {
            max_files: 1,
            max_file_size: 2,
        };
        let file = process_file("a.py", b"abc", &limits);
        assert_eq!(file.status, UploadStatus::Skipped);
        assert_eq!(file.size, 3);
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let file = process_file("a.txt", &[0xff, 0xfe, 0x00], &UploadLimits::default());
        assert_eq!(file.status, UploadStatus::Error);
        assert_eq!(file.content, NOT_TEXT);
    }

    #[test]
    fn text_is_returned_verbatim() {
        let file = process_file("a.py", b"print('hi')", &UploadLimits::default());
        assert_eq!(file.status, UploadStatus::Success);
        assert_eq!(file.content, "print('hi')");
    }
}
