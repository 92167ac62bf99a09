//! Builds the explorer tree from a flat list of uploaded paths.

use crate::models::{FileEntry, FileNode, ROOT_PATH};

/// Split a raw upload path into its directory segments and final file name.
///
/// Empty directory segments (leading, doubled or trailing separators) are
/// discarded. The file name is `None` when the path ends in a separator.
pub(crate) fn split_path(path: &str) -> (Vec<&str>, Option<&str>) {
    let mut parts: Vec<&str> = path.split('/').collect();
    let last = parts.pop().filter(|p| !p.is_empty());
    parts.retain(|p| !p.is_empty());
    (parts, last)
}

/// Path of the directory reached by walking `segments` from the root: `/a/b/`.
pub(crate) fn directory_path(segments: &[&str]) -> String {
    if segments.is_empty() {
        return ROOT_PATH.to_string();
    }
    format!("/{}/", segments.join("/"))
}

/// Canonical path of a file under `dirs`: `/a/b/c.py`.
pub(crate) fn file_path(dirs: &[&str], name: &str) -> String {
    format!("{}{}", directory_path(dirs), name)
}

/// Converts `(path, content)` pairs into a [`FileNode`] tree.
pub struct PathTreeBuilder;

impl PathTreeBuilder {
    /// Build a fresh tree rooted at `/`.
    ///
    /// Directories are matched by exact, case-sensitive name, so entries that
    /// share a prefix share the directory nodes. Every entry appends a new
    /// file node, even when a sibling file with the same name already exists.
    pub fn build(entries: &[FileEntry]) -> FileNode {
        let mut root = FileNode::root();
        for entry in entries {
            Self::insert(&mut root, entry);
        }
        root
    }

    fn insert(root: &mut FileNode, entry: &FileEntry) {
        let (dirs, name) = split_path(&entry.path);

        let mut current = root;
        for (depth, segment) in dirs.iter().enumerate() {
            let Some(children) = current.children_mut() else {
                return;
            };
            let index = match children
                .iter()
                .position(|c| c.is_directory() && c.name == *segment)
            {
                Some(index) => index,
                None => {
                    children.push(FileNode::directory(
                        *segment,
                        directory_path(&dirs[..=depth]),
                    ));
                    children.len() - 1
                }
            };
            current = &mut children[index];
        }

        let Some(name) = name else {
            tracing::debug!("Ignoring upload path without a file name: {}", entry.path);
            return;
        };
        if let Some(children) = current.children_mut() {
            children.push(FileNode::file(
                name,
                file_path(&dirs, name),
                entry.content.clone(),
            ));
        }
    }
}
