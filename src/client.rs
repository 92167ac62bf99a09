//! HTTP client for the feedback service.
//!
//! Configuration is via environment variables:
//! - `CODE_TUTOR_API_URL` - Base URL (default: `http://localhost:8000`)

use async_trait::async_trait;
use reqwest::{multipart, Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{FeedbackRequest, FeedbackResponse, UploadResponse};

/// Default URL for local development.
pub const DEFAULT_URL: &str = "http://localhost:8000";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// A file picked for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// The two operations the tutor needs from a feedback service.
#[async_trait]
pub trait FeedbackService: Send + Sync {
    /// Ask for feedback on a piece of code.
    async fn feedback(&self, request: &FeedbackRequest) -> Result<FeedbackResponse, ClientError>;

    /// Upload files and get their decoded text back.
    async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadResponse, ClientError>;
}

/// HTTP client for the feedback service.
#[derive(Debug, Clone)]
pub struct FeedbackClient {
    base_url: String,
    client: Client,
}

impl FeedbackClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("CODE_TUTOR_API_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        Self::new(base_url)
    }

    /// Create with explicit configuration.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
                StatusCode::UNPROCESSABLE_ENTITY => Err(ClientError::Validation(body)),
                _ => Err(ClientError::Server(format!("{}: {}", status, body))),
            }
        }
    }
}

#[async_trait]
impl FeedbackService for FeedbackClient {
    async fn feedback(&self, request: &FeedbackRequest) -> Result<FeedbackResponse, ClientError> {
        tracing::debug!(
            code_len = request.code.len(),
            rubric_len = request.rubric.len(),
            "Requesting feedback"
        );
        let response = self
            .client
            .post(self.url("/feedback"))
            .json(request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadResponse, ClientError> {
        let mut form = multipart::Form::new();
        for file in files {
            let part = multipart::Part::bytes(file.bytes)
                .file_name(file.filename)
                .mime_str("text/plain")?;
            form = form.part("files", part);
        }

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;
        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = FeedbackClient::new("http://localhost:8000/");
        assert_eq!(client.url("/feedback"), "http://localhost:8000/feedback");
    }
}
