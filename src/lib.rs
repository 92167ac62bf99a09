//! Code tutoring toolkit.
//!
//! The tutoring side ([`workspace::TutorWorkspace`]) keeps a file explorer,
//! the open file, a chat log and a rubric, and talks to a feedback service
//! through [`client::FeedbackService`]. The service side ([`api`]) is an axum
//! server implementing that feedback service on top of a completion provider.

pub mod api;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod explorer;
pub mod llm;
pub mod loader;
pub mod models;
pub mod resources;
pub mod workspace;
