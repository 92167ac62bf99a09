//! File explorer: the tree of uploaded files plus its open/closed state.

mod builder;
mod expansion;
pub mod tree_render;

pub use builder::PathTreeBuilder;
pub use expansion::ExpansionState;
pub use tree_render::TreeRow;

use crate::models::{FileEntry, FileNode};

/// Tree and expansion state, owned together and handed to whoever uploads
/// files or draws the tree.
#[derive(Debug, Clone)]
pub struct FileExplorer {
    tree: FileNode,
    expansion: ExpansionState,
}

impl Default for FileExplorer {
    fn default() -> Self {
        Self::with_demo_content()
    }
}

impl FileExplorer {
    /// An explorer with no files.
    pub fn empty() -> Self {
        Self {
            tree: FileNode::root(),
            expansion: ExpansionState::new(),
        }
    }

    /// The starter project shown before anything is uploaded.
    pub fn with_demo_content() -> Self {
        let mut tree = FileNode::root();
        let mut app = FileNode::directory("app", "/app/");
        if let Some(children) = app.children_mut() {
            children.push(FileNode::file(
                "page.tsx",
                "/app/page.tsx",
                "export default function Page() {\n  return <div>Hello World</div>\n}",
            ));
        }
        if let Some(children) = tree.children_mut() {
            children.push(app);
        }
        Self {
            tree,
            expansion: ExpansionState::new(),
        }
    }

    /// Replace the whole tree with `entries` and open every directory that
    /// leads to one of them.
    pub fn add_files_to_structure(&mut self, entries: &[FileEntry]) {
        self.tree = PathTreeBuilder::build(entries);
        self.expansion
            .reset_and_expand_ancestors(entries.iter().map(|e| e.path.as_str()));
        tracing::info!(
            files = self.tree.leaf_count(),
            expanded = self.expansion.len(),
            "Rebuilt file tree"
        );
    }

    pub fn toggle_folder(&mut self, path: &str) {
        self.expansion.toggle(path);
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expansion.is_expanded(path)
    }

    pub fn tree(&self) -> &FileNode {
        &self.tree
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn find(&self, path: &str) -> Option<&FileNode> {
        self.tree.find(path)
    }

    pub fn visible_rows(&self) -> Vec<TreeRow> {
        tree_render::visible_rows(&self.tree, &self.expansion)
    }

    pub fn render(&self) -> String {
        tree_render::render_tree(&self.tree, &self.expansion)
    }
}
