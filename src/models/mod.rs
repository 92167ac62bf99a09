//! Domain models for the tutor.
//!
//! - [`FileNode`]: the explorer tree built from uploaded or demo files.
//! - [`ChatMessage`]: one user or assistant turn in a chat session.
//! - [`Resource`]: a static catalog entry offered as further reading.
//! - Wire types ([`FeedbackRequest`], [`UploadResponse`], ...) shared by the
//!   feedback client and the feedback server.

mod chat;
mod file_node;
mod resource;
mod wire;

pub use chat::*;
pub use file_node::*;
pub use resource::*;
pub use wire::*;
