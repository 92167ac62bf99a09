use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::upload::{is_safe_filename, process_file};
use super::AppState;
use crate::llm::{tutoring_prompt, LlmError};
use crate::models::{FeedbackRequest, FeedbackResponse, UploadResponse};

// ============================================================
// Error Handling
// ============================================================

/// Log a provider failure and return a sanitized response to the client.
/// A missing API key is a configuration problem the operator needs to see,
/// so its message is passed through.
fn completion_error(e: LlmError) -> (StatusCode, String) {
    match e {
        LlmError::MissingApiKey => {
            tracing::error!("Feedback requested but no API key is configured");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        other => {
            tracing::error!("Completion error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Feedback provider error".to_string(),
            )
        }
    }
}

fn bad_multipart(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::warn!("Malformed upload: {}", e);
    (StatusCode::BAD_REQUEST, format!("Malformed upload: {}", e))
}

fn no_files() -> (StatusCode, String) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        "No files provided".to_string(),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Upload
// ============================================================

pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let mut received = Vec::new();
    loop {
        // A form with no parts at all fails to parse; that is a missing field,
        // not a malformed upload.
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if received.is_empty() => {
                tracing::debug!("Multipart ended before any file part: {}", e);
                return Err(no_files());
            }
            Err(e) => return Err(bad_multipart(e)),
        };
        if field.name() != Some("files") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(bad_multipart)?;
        received.push((filename, bytes));
    }

    if received.is_empty() {
        return Err(no_files());
    }
    if received.len() > state.limits.max_files {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "Too many files. Maximum {} files allowed per request",
                state.limits.max_files
            ),
        ));
    }
    if let Some((name, _)) = received.iter().find(|(name, _)| !is_safe_filename(name)) {
        tracing::warn!("Rejected upload with unsafe filename: {:?}", name);
        return Err((StatusCode::BAD_REQUEST, "Invalid filename".to_string()));
    }

    let files: Vec<_> = received
        .iter()
        .map(|(name, bytes)| process_file(name, bytes, &state.limits))
        .collect();

    tracing::info!("Processed {} uploaded files", files.len());
    Ok(Json(UploadResponse {
        status: "success".to_string(),
        message: format!("Processed {} files", files.len()),
        files,
    }))
}

// ============================================================
// Feedback
// ============================================================

pub async fn get_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, (StatusCode, String)> {
    let prompt = tutoring_prompt(&request);
    let feedback = state
        .backend
        .complete(&prompt)
        .await
        .map_err(completion_error)?;

    Ok(Json(FeedbackResponse {
        status: "success".to_string(),
        feedback,
    }))
}
