//! Resource recommendations based on what the student is working on.
//!
//! Keywords come from three places: the selected file's extension, the rubric
//! and the most recent chat turns. A resource is relevant when any of its tags
//! and any keyword contain one another. When nothing matches, the first few
//! catalog entries are shown instead.

pub mod catalog;

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ChatMessage, Resource};

/// Number of trailing chat messages that contribute keywords.
pub const DEFAULT_MESSAGE_WINDOW: usize = 3;

/// Number of catalog entries returned when nothing matches.
pub const FALLBACK_COUNT: usize = 3;

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("valid non-word pattern"));

/// Keywords implied by a file extension.
pub fn extension_keywords(extension: &str) -> &'static [&'static str] {
    match extension {
        "py" => &["python"],
        "js" => &["javascript"],
        "ts" | "tsx" => &["typescript", "react"],
        "css" => &["css"],
        "html" => &["html"],
        _ => &[],
    }
}

/// Lower-cased text after the last `.` of a file name or path.
///
/// A name without a dot yields the whole name, which simply maps to no
/// keywords.
pub fn extension_of(path: &str) -> Option<String> {
    path.rsplit('.')
        .next()
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
}

/// Split free text into distinct lower-case words longer than two characters,
/// in first-seen order.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, "");
    let mut seen = BTreeSet::new();
    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .filter(|word| seen.insert(word.to_string()))
        .map(str::to_string)
        .collect()
}

/// Filters a resource catalog by keyword overlap.
#[derive(Debug, Clone, Copy)]
pub struct ResourceMatcher {
    window: usize,
}

impl Default for ResourceMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_WINDOW)
    }
}

impl ResourceMatcher {
    /// A matcher that reads the last `window` chat messages.
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Collect the keyword set for the current context.
    pub fn keywords(
        &self,
        file_extension: Option<&str>,
        rubric: Option<&str>,
        recent_messages: &[ChatMessage],
    ) -> BTreeSet<String> {
        let mut keywords = BTreeSet::new();

        if let Some(ext) = file_extension {
            keywords.extend(
                extension_keywords(&ext.to_lowercase())
                    .iter()
                    .map(|k| k.to_string()),
            );
        }

        if let Some(rubric) = rubric {
            keywords.extend(tokenize(rubric));
        }

        let start = recent_messages.len().saturating_sub(self.window);
        for message in &recent_messages[start..] {
            keywords.extend(tokenize(&message.content));
        }

        keywords
    }

    /// Resources relevant to the context, in catalog order.
    pub fn recommend<'c>(
        &self,
        file_extension: Option<&str>,
        rubric: Option<&str>,
        recent_messages: &[ChatMessage],
        catalog: &'c [Resource],
    ) -> Vec<&'c Resource> {
        let keywords = self.keywords(file_extension, rubric, recent_messages);

        let matched: Vec<&Resource> = catalog
            .iter()
            .filter(|resource| matches_any(resource, &keywords))
            .collect();

        if matched.is_empty() {
            tracing::debug!(
                keywords = keywords.len(),
                "No resources matched, using defaults"
            );
            return catalog.iter().take(FALLBACK_COUNT).collect();
        }
        matched
    }
}

fn matches_any(resource: &Resource, keywords: &BTreeSet<String>) -> bool {
    resource.tags.iter().any(|tag| {
        keywords
            .iter()
            .any(|keyword| tag.contains(keyword.as_str()) || keyword.contains(tag.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(resources: &[&Resource]) -> Vec<String> {
        resources.iter().map(|r| r.title.clone()).collect()
    }

    #[test]
    fn tokenize_strips_punctuation_and_short_words() {
        assert_eq!(
            tokenize("Use PEP-8, and docstrings! Use it."),
            vec!["use", "pep8", "and", "docstrings"]
        );
    }

    #[test]
    fn tokenize_drops_non_ascii_letters() {
        assert_eq!(tokenize("naïve café code"), vec!["nave", "caf", "code"]);
    }

    #[test]
    fn extension_of_takes_last_dot_segment() {
        assert_eq!(extension_of("/app/page.TSX").as_deref(), Some("tsx"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of("Makefile").as_deref(), Some("makefile"));
        assert_eq!(extension_of("trailing.").as_deref(), None);
    }

    #[test]
    fn python_extension_matches_python_resources() {
        let matcher = ResourceMatcher::default();
        let found = matcher.recommend(Some("py"), None, &[], catalog::builtin());
        let titles = titles(&found);
        assert!(titles.contains(&"Python Documentation".to_string()));
        assert!(!titles.contains(&"CSS Tricks".to_string()));
    }

    #[test]
    fn substring_match_is_symmetric() {
        let matcher = ResourceMatcher::default();
        // "typescripts" contains the tag "typescript"; "react" is contained in "reactjs".
        let found = matcher.recommend(None, Some("typescripts reactjs"), &[], catalog::builtin());
        let titles = titles(&found);
        assert!(titles.contains(&"TypeScript Handbook".to_string()));
        assert!(titles.contains(&"Next.js Documentation".to_string()));
    }

    #[test]
    fn only_last_window_messages_count() {
        let matcher = ResourceMatcher::default();
        let messages = vec![
            ChatMessage::user("tell me about html"),
            ChatMessage::user("okay"),
            ChatMessage::assistant("sure"),
            ChatMessage::user("thanks"),
        ];
        let keywords = matcher.keywords(None, None, &messages);
        assert!(!keywords.contains("html"));
        assert!(keywords.contains("thanks"));
    }

    #[test]
    fn falls_back_to_first_three_entries() {
        let matcher = ResourceMatcher::default();
        let found = matcher.recommend(None, Some("zz"), &[], catalog::builtin());
        assert_eq!(
            titles(&found),
            vec![
                "Python Documentation",
                "Python Style Guide (PEP 8)",
                "Real Python Tutorials"
            ]
        );
    }
}
