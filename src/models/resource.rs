use serde::{Deserialize, Serialize};

/// A learning resource that can be recommended alongside feedback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub title: String,
    pub description: String,
    pub url: String,
    pub tags: Vec<String>,
}

impl Resource {
    pub fn new(title: &str, description: &str, url: &str, tags: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            url: url.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}
