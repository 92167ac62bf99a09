use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use code_tutor::api::create_router;
use code_tutor::api::upload::UploadLimits;
use code_tutor::config::ServerConfig;
use code_tutor::llm::{CompletionBackend, LlmError, Prompt};
use code_tutor::models::*;

/// Completion backend with a fixed behaviour.
enum StubBackend {
    Reply(&'static str),
    NoApiKey,
    Unavailable,
}

#[async_trait]
impl CompletionBackend for StubBackend {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        match self {
            Self::Reply(text) => Ok(format!("{} ({} chars reviewed)", text, prompt.user.len())),
            Self::NoApiKey => Err(LlmError::MissingApiKey),
            Self::Unavailable => Err(LlmError::Provider {
                status: 503,
                body: "upstream secret details".to_string(),
            }),
        }
    }
}

fn setup_with(backend: StubBackend, config: ServerConfig) -> TestServer {
    let app = create_router(Arc::new(backend), &config);
    TestServer::new(app).expect("Failed to create test server")
}

fn setup() -> TestServer {
    setup_with(
        StubBackend::Reply("Test feedback response"),
        ServerConfig::permissive(),
    )
}

fn text_part(filename: &str, content: &str) -> Part {
    Part::bytes(content.as_bytes().to_vec())
        .file_name(filename)
        .mime_type("text/plain")
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();
        let response = server.get("/health").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ok");
    }
}

mod upload {
    use super::*;

    #[tokio::test]
    async fn returns_text_of_a_single_file() {
        let server = setup();
        let form = MultipartForm::new().add_part("files", text_part("test.py", "print(\"Hello, World!\")"));

        let response = server.post("/upload").multipart(form).await;

        response.assert_status_ok();
        let body: UploadResponse = response.json();
        assert_eq!(body.status, "success");
        assert_eq!(body.message, "Processed 1 files");
        assert_eq!(body.files.len(), 1);
        assert_eq!(body.files[0].filename, "test.py");
        assert_eq!(body.files[0].content, "print(\"Hello, World!\")");
        assert_eq!(body.files[0].status, UploadStatus::Success);
        assert_eq!(body.files[0].size, 22);
    }

    #[tokio::test]
    async fn processes_multiple_files_in_order() {
        let server = setup();
        let form = MultipartForm::new()
            .add_part("files", text_part("test1.py", "print(\"File 1\")"))
            .add_part("files", text_part("test2.txt", "Hello from file 2"));

        let response = server.post("/upload").multipart(form).await;

        response.assert_status_ok();
        let body: UploadResponse = response.json();
        let names: Vec<_> = body.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["test1.py", "test2.txt"]);
        assert!(body.files.iter().all(|f| f.status == UploadStatus::Success));
    }

    #[tokio::test]
    async fn marks_disallowed_types_as_errors() {
        let server = setup();
        let form = MultipartForm::new().add_part(
            "files",
            Part::bytes(vec![0u8, 159, 146, 150])
                .file_name("test.bin")
                .mime_type("application/octet-stream"),
        );

        let response = server.post("/upload").multipart(form).await;

        response.assert_status_ok();
        let body: UploadResponse = response.json();
        assert_eq!(body.files[0].status, UploadStatus::Error);
        assert_eq!(body.files[0].content, "File type not allowed");
        assert!(body.first_success().is_none());
    }

    #[tokio::test]
    async fn marks_undecodable_text_files_as_errors() {
        let server = setup();
        let form = MultipartForm::new().add_part(
            "files",
            Part::bytes(vec![0xffu8, 0xfe, 0xfd])
                .file_name("notes.txt")
                .mime_type("text/plain"),
        );

        let response = server.post("/upload").multipart(form).await;

        response.assert_status_ok();
        let body: UploadResponse = response.json();
        assert_eq!(body.files[0].status, UploadStatus::Error);
        assert!(body.files[0].content.contains("binary"));
    }

    #[tokio::test]
    async fn skips_files_over_the_size_limit() {
        let server = setup();
        let large = vec![b'a'; 6 * 1024 * 1024];
        let form = MultipartForm::new().add_part(
            "files",
            Part::bytes(large).file_name("large.txt").mime_type("text/plain"),
        );

        let response = server.post("/upload").multipart(form).await;

        response.assert_status_ok();
        let body: UploadResponse = response.json();
        assert_eq!(body.files[0].filename, "large.txt");
        assert_eq!(body.files[0].status, UploadStatus::Skipped);
        assert!(body.files[0].content.contains("File too large to process"));
        assert_eq!(body.files[0].size, 6 * 1024 * 1024);
    }

    #[tokio::test]
    async fn rejects_too_many_files() {
        let config = ServerConfig::permissive().with_limits(UploadLimits {
            max_files: 2,
            max_file_size: 1024,
        });
        let server = setup_with(StubBackend::Reply("unused"), config);
        let form = MultipartForm::new()
            .add_part("files", text_part("a.py", "a"))
            .add_part("files", text_part("b.py", "b"))
            .add_part("files", text_part("c.py", "c"));

        let response = server.post("/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("Maximum 2 files"));
    }

    #[tokio::test]
    async fn rejects_filenames_with_directories() {
        let server = setup();
        let form = MultipartForm::new().add_part("files", text_part("src/evil.py", "x"));

        let response = server.post("/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "Invalid filename");
    }

    #[tokio::test]
    async fn requires_at_least_one_file() {
        let server = setup();

        let response = server.post("/upload").multipart(MultipartForm::new()).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.text(), "No files provided");
    }

    #[tokio::test]
    async fn requires_a_files_field() {
        let server = setup();
        let form = MultipartForm::new().add_text("note", "not a file");

        let response = server.post("/upload").multipart(form).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.text(), "No files provided");
    }

    #[tokio::test]
    async fn ignores_fields_other_than_files() {
        let server = setup();
        let form = MultipartForm::new()
            .add_text("note", "not a file")
            .add_part("files", text_part("a.md", "# Title"));

        let response = server.post("/upload").multipart(form).await;

        response.assert_status_ok();
        let body: UploadResponse = response.json();
        assert_eq!(body.files.len(), 1);
        assert_eq!(body.files[0].content, "# Title");
    }
}

mod feedback {
    use super::*;

    fn request() -> FeedbackRequest {
        FeedbackRequest {
            code: "def add(a, b):\n    return a + b".to_string(),
            rubric: "Function should include docstring and type hints".to_string(),
            user_question: "How can I improve this code?".to_string(),
        }
    }

    #[tokio::test]
    async fn returns_feedback_from_backend() {
        let server = setup();

        let response = server.post("/feedback").json(&request()).await;

        response.assert_status_ok();
        let body: FeedbackResponse = response.json();
        assert_eq!(body.status, "success");
        assert!(body.feedback.starts_with("Test feedback response"));
    }

    #[tokio::test]
    async fn accepts_empty_fields() {
        let server = setup();

        let response = server
            .post("/feedback")
            .json(&serde_json::json!({ "code": "", "rubric": "", "userQuestion": "" }))
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn rejects_missing_fields() {
        let server = setup();

        let response = server
            .post("/feedback")
            .json(&serde_json::json!({ "code": "def add(a, b):\n    return a + b" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn reports_missing_api_key() {
        let server = setup_with(StubBackend::NoApiKey, ServerConfig::permissive());

        let response = server.post("/feedback").json(&request()).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), "OpenAI API key not configured");
    }

    #[tokio::test]
    async fn hides_provider_error_details() {
        let server = setup_with(StubBackend::Unavailable, ServerConfig::permissive());

        let response = server.post("/feedback").json(&request()).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.text().contains("secret"));
    }
}
