use thiserror::Error;

use crate::client::ClientError;

/// Failures the tutor reports next to the control that triggered them.
#[derive(Debug, Error)]
pub enum TutorError {
    #[error("Network error: {0}")]
    Network(#[from] ClientError),

    #[error("No valid files were uploaded")]
    NoValidFile,

    #[error("Could not read {path}: {reason}")]
    Read { path: String, reason: String },
}

impl TutorError {
    pub fn read(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::Read {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Short text suitable for an inline error next to the triggering control.
    pub fn inline_message(&self) -> String {
        match self {
            Self::Network(_) => "Failed to upload file".to_string(),
            other => other.to_string(),
        }
    }
}
