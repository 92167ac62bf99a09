use serde::{Deserialize, Serialize};

/// Path of the tree root.
pub const ROOT_PATH: &str = "/";

/// Display name of the tree root.
pub const ROOT_NAME: &str = "project";

/// One file from a folder upload, before it is placed into the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Slash-separated path relative to the upload root, e.g. `src/main.py`.
    pub path: String,
    pub content: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// A node in the explorer tree.
///
/// Directory paths end with a separator (`/src/`, `/src/util/`) so they can be
/// used directly as expansion keys; file paths do not (`/src/main.py`). The
/// root is the only node whose path is `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// File or directory payload of a [`FileNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    File { content: String },
    Directory { children: Vec<FileNode> },
}

impl FileNode {
    /// An empty root directory.
    pub fn root() -> Self {
        Self::directory(ROOT_NAME, ROOT_PATH)
    }

    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory {
                children: Vec::new(),
            },
        }
    }

    pub fn file(
        name: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File {
                content: content.into(),
            },
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    /// Children of a directory; files have none.
    pub fn children(&self) -> &[FileNode] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            NodeKind::File { .. } => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<FileNode>> {
        match &mut self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Find a node by path.
    ///
    /// Sibling files may share a name when a batch repeats a path; the most
    /// recently added one wins.
    pub fn find(&self, path: &str) -> Option<&FileNode> {
        if self.path == path {
            return Some(self);
        }
        if !self.is_directory() {
            return None;
        }
        self.children()
            .iter()
            .rev()
            .find_map(|child| child.find(path))
    }

    /// Number of file nodes under (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            NodeKind::File { .. } => 1,
            NodeKind::Directory { children } => children.iter().map(FileNode::leaf_count).sum(),
        }
    }

    /// Paths of every file node, depth first in insertion order.
    pub fn file_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.collect_file_paths(&mut paths);
        paths
    }

    fn collect_file_paths<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            NodeKind::File { .. } => out.push(&self.path),
            NodeKind::Directory { children } => {
                for child in children {
                    child.collect_file_paths(out);
                }
            }
        }
    }
}
