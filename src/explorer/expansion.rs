use std::collections::BTreeSet;

use super::builder::{directory_path, split_path};
use crate::models::ROOT_PATH;

/// Set of directory paths currently shown open in the explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeSet<String>,
}

impl Default for ExpansionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpansionState {
    /// Only the root is open.
    pub fn new() -> Self {
        let mut expanded = BTreeSet::new();
        expanded.insert(ROOT_PATH.to_string());
        Self { expanded }
    }

    /// Flip a directory between open and closed.
    pub fn toggle(&mut self, path: &str) {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    /// Clear the set, then open the root and every ancestor directory of the
    /// given file paths (`/a/b/c.py` opens `/a/` and `/a/b/`).
    pub fn reset_and_expand_ancestors<'a, I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.expanded.clear();
        self.expanded.insert(ROOT_PATH.to_string());
        for path in paths {
            let (dirs, _) = split_path(path);
            for depth in 1..=dirs.len() {
                self.expanded.insert(directory_path(&dirs[..depth]));
            }
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_root_open() {
        let state = ExpansionState::new();
        assert!(state.is_expanded("/"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut state = ExpansionState::new();
        state.toggle("/src/");
        assert!(state.is_expanded("/src/"));
        state.toggle("/src/");
        assert!(!state.is_expanded("/src/"));
    }

    #[test]
    fn reset_expands_every_ancestor() {
        let mut state = ExpansionState::new();
        state.toggle("/stale/");
        state.reset_and_expand_ancestors(["/a/b/c.py"]);
        let paths: Vec<_> = state.paths().collect();
        assert_eq!(paths, vec!["/", "/a/", "/a/b/"]);
    }

    #[test]
    fn reset_accepts_relative_upload_paths() {
        let mut state = ExpansionState::new();
        state.reset_and_expand_ancestors(["proj/src/main.py", "proj/README.md", "top.txt"]);
        let paths: Vec<_> = state.paths().collect();
        assert_eq!(paths, vec!["/", "/proj/", "/proj/src/"]);
    }
}
