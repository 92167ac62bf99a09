//! ASCII rendering of the explorer tree.

use super::expansion::ExpansionState;
use crate::models::FileNode;

const OPEN: char = '▾';
const CLOSED: char = '▸';

/// A row the explorer would draw, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub depth: usize,
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    /// Always `false` for files.
    pub expanded: bool,
}

/// Flatten the tree into rows, descending only into expanded directories.
pub fn visible_rows(root: &FileNode, expansion: &ExpansionState) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    collect_rows(&mut rows, root, expansion, 0);
    rows
}

fn collect_rows(rows: &mut Vec<TreeRow>, node: &FileNode, expansion: &ExpansionState, depth: usize) {
    let expanded = node.is_directory() && expansion.is_expanded(&node.path);
    rows.push(TreeRow {
        depth,
        name: node.name.clone(),
        path: node.path.clone(),
        is_directory: node.is_directory(),
        expanded,
    });
    if expanded {
        for child in node.children() {
            collect_rows(rows, child, expansion, depth + 1);
        }
    }
}

/// Render the tree as ASCII art.
///
/// Example output:
/// ```text
/// ▾ project
/// ├── ▾ app
/// │   ├── page.tsx
/// │   └── ▸ components
/// └── README.md
/// ```
pub fn render_tree(root: &FileNode, expansion: &ExpansionState) -> String {
    let mut output = String::new();
    render_node(&mut output, root, expansion, "", true, true);
    output
}

fn render_node(
    output: &mut String,
    node: &FileNode,
    expansion: &ExpansionState,
    prefix: &str,
    is_last: bool,
    is_root: bool,
) {
    if !is_root {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
    }

    let expanded = node.is_directory() && expansion.is_expanded(&node.path);
    if node.is_directory() {
        output.push(if expanded { OPEN } else { CLOSED });
        output.push(' ');
    }
    output.push_str(&node.name);
    output.push('\n');

    if !expanded {
        return;
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let child_is_last = i == children.len() - 1;
        render_node(output, child, expansion, &child_prefix, child_is_last, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::PathTreeBuilder;
    use crate::models::FileEntry;

    fn sample_tree() -> FileNode {
        PathTreeBuilder::build(&[
            FileEntry::new("app/page.tsx", ""),
            FileEntry::new("app/components/button.tsx", ""),
            FileEntry::new("README.md", ""),
        ])
    }

    #[test]
    fn test_root_only_when_collapsed() {
        let tree = sample_tree();
        let mut expansion = ExpansionState::new();
        expansion.toggle("/");
        assert_eq!(render_tree(&tree, &expansion), "▸ project\n");
    }

    #[test]
    fn test_collapsed_directory_hides_children() {
        let tree = sample_tree();
        let expansion = ExpansionState::new();
        assert_eq!(
            render_tree(&tree, &expansion),
            "▾ project\n├── ▸ app\n└── README.md\n"
        );
    }

    #[test]
    fn test_nested_expanded() {
        let tree = sample_tree();
        let mut expansion = ExpansionState::new();
        expansion.toggle("/app/");
        expansion.toggle("/app/components/");
        let expected = "▾ project\n├── ▾ app\n│   ├── page.tsx\n│   └── ▾ components\n│       └── button.tsx\n└── README.md\n";
        assert_eq!(render_tree(&tree, &expansion), expected);
    }

    #[test]
    fn test_visible_rows_follow_expansion() {
        let tree = sample_tree();
        let mut expansion = ExpansionState::new();
        expansion.toggle("/app/");
        let rows = visible_rows(&tree, &expansion);
        let paths: Vec<_> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/", "/app/", "/app/page.tsx", "/app/components/", "/README.md"]
        );
        assert_eq!(rows[2].depth, 2);
        assert!(!rows[3].expanded);
    }
}
