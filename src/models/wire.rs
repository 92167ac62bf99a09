use serde::{Deserialize, Serialize};

/// Body of `POST /feedback`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub code: String,
    /// Evaluation criteria, forwarded verbatim to the model.
    pub rubric: String,
    pub user_question: String,
}

/// Response of `POST /feedback`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackResponse {
    pub status: String,
    pub feedback: String,
}

/// Per-file outcome of an upload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Success,
    Error,
    Skipped,
}

/// One processed file in an [`UploadResponse`].
///
/// For `success` the `content` is the decoded text; otherwise it holds a short
/// reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub content: String,
    pub size: u64,
    pub status: UploadStatus,
}

/// Response of `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    pub status: String,
    pub message: String,
    pub files: Vec<UploadedFile>,
}

impl UploadResponse {
    /// The first file the server accepted, if any.
    pub fn first_success(&self) -> Option<&UploadedFile> {
        self.files
            .iter()
            .find(|f| f.status == UploadStatus::Success)
    }
}
