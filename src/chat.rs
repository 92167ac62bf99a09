//! Chat session: the ordered log of turns and the request/reply cycle.

use thiserror::Error;

use crate::client::FeedbackService;
use crate::models::{ChatMessage, FeedbackRequest, Role};

/// Greeting shown before the student has said anything.
pub const PLACEHOLDER_GREETING: &str = "Hello! I'm your AI tutor. I can help you understand and improve your code. Select a file to get started!";

/// Assistant turn appended when the feedback service fails.
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Rubric used when none is set and no file is selected.
pub const GENERIC_RUBRIC: &str = "Please help with this coding question";

/// Reasons a submission is not sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("A reply is already in progress")]
    Busy,
}

/// What the tutor is looking at when a question is asked.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyContext<'a> {
    pub selected_file: Option<&'a str>,
    pub selected_content: Option<&'a str>,
    /// Empty means "use the default criteria".
    pub rubric: &'a str,
}

impl ReplyContext<'_> {
    /// Assemble the feedback request for `question`.
    ///
    /// The selected file's content is reviewed when there is one, otherwise
    /// the question itself stands in as the code.
    pub fn to_request(&self, question: &str) -> FeedbackRequest {
        let code = self
            .selected_content
            .filter(|c| !c.is_empty())
            .unwrap_or(question);

        let rubric = if !self.rubric.is_empty() {
            self.rubric.to_string()
        } else if let Some(file) = self.selected_file.filter(|f| !f.is_empty()) {
            format!("Please analyze this {} file", file)
        } else {
            GENERIC_RUBRIC.to_string()
        };

        FeedbackRequest {
            code: code.to_string(),
            rubric,
            user_question: question.to_string(),
        }
    }
}

/// In-memory chat log with a single outstanding request at a time.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    loading: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// A session showing only the placeholder greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(PLACEHOLDER_GREETING)],
            loading: false,
        }
    }

    /// A session with no messages at all.
    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            loading: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn only_placeholder(&self) -> bool {
        matches!(
            self.messages.as_slice(),
            [only] if only.role == Role::Assistant && only.content == PLACEHOLDER_GREETING
        )
    }

    /// Record a student turn; the first one replaces the greeting.
    pub fn append_user_turn(&mut self, text: impl Into<String>) {
        if self.only_placeholder() {
            self.messages.clear();
        }
        self.messages.push(ChatMessage::user(text));
    }

    pub fn append_assistant_turn(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(text));
    }

    /// Ask the service about `question` and append exactly one assistant turn:
    /// the feedback, or [`APOLOGY`] if the request failed or was dropped.
    pub async fn request_reply<S>(
        &mut self,
        service: &S,
        question: &str,
        context: ReplyContext<'_>,
    ) -> &ChatMessage
    where
        S: FeedbackService + ?Sized,
    {
        let request = context.to_request(question);

        let pending = PendingReply::start(self);
        let reply = match service.feedback(&request).await {
            Ok(response) => response.feedback,
            Err(e) => {
                tracing::warn!("Feedback request failed: {}", e);
                APOLOGY.to_string()
            }
        };
        let index = pending.settle(reply);

        &self.messages[index]
    }

    /// Submit a message: trim it, record the user turn and fetch a reply.
    pub async fn send<S>(
        &mut self,
        service: &S,
        text: &str,
        context: ReplyContext<'_>,
    ) -> Result<&ChatMessage, ChatError>
    where
        S: FeedbackService + ?Sized,
    {
        let question = text.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.loading {
            return Err(ChatError::Busy);
        }

        self.append_user_turn(question);
        Ok(self.request_reply(service, question, context).await)
    }
}

/// An outstanding request. Holds the loading flag until a reply is settled;
/// if dropped first, the flag is cleared and the apology is appended so the
/// user turn is never left unanswered.
struct PendingReply<'a> {
    session: &'a mut ChatSession,
    settled: bool,
}

impl<'a> PendingReply<'a> {
    fn start(session: &'a mut ChatSession) -> Self {
        session.loading = true;
        Self {
            session,
            settled: false,
        }
    }

    /// Append the reply and return its index in the log.
    fn settle(mut self, reply: String) -> usize {
        self.settled = true;
        self.session.loading = false;
        self.session.append_assistant_turn(reply);
        self.session.messages.len() - 1
    }
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Feedback request dropped before a reply arrived");
            self.session.loading = false;
            self.session.append_assistant_turn(APOLOGY);
        }
    }
}
