//! The tutor's single owning coordinator.
//!
//! [`TutorWorkspace`] holds every piece of session state (explorer, selected
//! file, chat log, rubric) and is the only place that mutates it. Views read
//! through the accessors; actions go through the methods.

use std::path::Path;

use crate::chat::{ChatError, ChatSession, ReplyContext};
use crate::client::{FeedbackService, UploadFile};
use crate::error::TutorError;
use crate::explorer::FileExplorer;
use crate::loader;
use crate::models::{ChatMessage, FileEntry, Resource};
use crate::resources::{catalog, extension_of, ResourceMatcher};

/// The file currently open in the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: String,
    pub content: String,
}

pub struct TutorWorkspace<S> {
    service: S,
    explorer: FileExplorer,
    selection: Option<Selection>,
    chat: ChatSession,
    rubric: String,
    matcher: ResourceMatcher,
    catalog: &'static [Resource],
    upload_error: Option<String>,
}

impl<S: FeedbackService> TutorWorkspace<S> {
    /// A workspace with the demo project, greeting and built-in catalog.
    pub fn new(service: S) -> Self {
        Self {
            service,
            explorer: FileExplorer::with_demo_content(),
            selection: None,
            chat: ChatSession::new(),
            rubric: String::new(),
            matcher: ResourceMatcher::default(),
            catalog: catalog::builtin(),
            upload_error: None,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn explorer(&self) -> &FileExplorer {
        &self.explorer
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.chat.messages()
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn rubric(&self) -> &str {
        &self.rubric
    }

    /// Inline message from the last failed upload, cleared when a new one starts.
    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    // ============================================================
    // Explorer
    // ============================================================

    /// Replace the explorer tree with a folder's files.
    pub fn add_folder(&mut self, entries: &[FileEntry]) {
        self.explorer.add_files_to_structure(entries);
    }

    /// Read `dir` from disk and show it in the explorer.
    ///
    /// On failure the current tree is left as it was.
    pub fn load_folder(&mut self, dir: &Path) -> Result<usize, TutorError> {
        self.upload_error = None;
        match loader::read_folder(dir) {
            Ok(entries) => {
                self.add_folder(&entries);
                Ok(entries.len())
            }
            Err(e) => {
                self.upload_error = Some(e.inline_message());
                Err(e)
            }
        }
    }

    pub fn toggle_folder(&mut self, path: &str) {
        self.explorer.toggle_folder(path);
    }

    /// Open a file from the tree. Directories and unknown paths are ignored.
    pub fn select_file(&mut self, path: &str) -> bool {
        let Some(node) = self.explorer.find(path) else {
            return false;
        };
        let Some(content) = node.content() else {
            return false;
        };
        self.selection = Some(Selection {
            path: node.path.clone(),
            content: content.to_string(),
        });
        true
    }

    /// Open content that did not come from the tree, such as a single upload.
    pub fn open_file(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.selection = Some(Selection {
            path: name.into(),
            content: content.into(),
        });
    }

    /// Edit the open file. The tree keeps its original content.
    pub fn edit_content(&mut self, content: impl Into<String>) {
        if let Some(selection) = self.selection.as_mut() {
            selection.content = content.into();
        }
    }

    pub fn set_rubric(&mut self, rubric: impl Into<String>) {
        self.rubric = rubric.into();
    }

    // ============================================================
    // Remote operations
    // ============================================================

    /// Upload local files and open the first one the server decoded.
    pub async fn upload_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), TutorError> {
        self.upload_error = None;
        let result = self.try_upload(paths).await;
        if let Err(ref e) = result {
            tracing::warn!("Upload failed: {}", e);
            self.upload_error = Some(e.inline_message());
        }
        result
    }

    async fn try_upload<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), TutorError> {
        let files = paths
            .iter()
            .map(|p| read_upload(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let response = self.service.upload(files).await?;
        let uploaded = response.first_success().ok_or(TutorError::NoValidFile)?;

        tracing::info!(
            "Uploaded {} files, opening {} ({} bytes)",
            response.files.len(),
            uploaded.filename,
            uploaded.size
        );
        self.open_file(uploaded.filename.clone(), uploaded.content.clone());
        Ok(())
    }

    /// Send a chat message about the open file.
    pub async fn send_message(&mut self, text: &str) -> Result<&ChatMessage, ChatError> {
        let context = ReplyContext {
            selected_file: self.selection.as_ref().map(|s| s.path.as_str()),
            selected_content: self.selection.as_ref().map(|s| s.content.as_str()),
            rubric: &self.rubric,
        };
        self.chat.send(&self.service, text, context).await
    }

    // ============================================================
    // Recommendations
    // ============================================================

    pub fn recommendations(&self) -> Vec<&'static Resource> {
        let extension = self
            .selection
            .as_ref()
            .and_then(|s| extension_of(&s.path));
        let rubric = Some(self.rubric.as_str()).filter(|r| !r.is_empty());
        self.matcher.recommend(
            extension.as_deref(),
            rubric,
            self.chat.messages(),
            self.catalog,
        )
    }
}

fn read_upload(path: &Path) -> Result<UploadFile, TutorError> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| TutorError::read(path.display(), "no file name"))?;
    let bytes = std::fs::read(path).map_err(|e| TutorError::read(path.display(), e))?;
    Ok(UploadFile::new(filename, bytes))
}
