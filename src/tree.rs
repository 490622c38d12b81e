/*!
 * Text rendering of the exported file hierarchy
 */

use crate::types::TreeNode;

/// Returned when there is nothing to draw
pub const EMPTY_TREE: &str = "(No files found to include in tree)\n";

/// Title line of a rendered tree
pub const TREE_TITLE: &str = "Exported File Structure:";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// Render a sorted file list as an indented tree drawing
pub fn render<S: AsRef<str>>(files: &[S]) -> String {
    if files.is_empty() {
        return EMPTY_TREE.to_string();
    }

    let root = TreeNode::from_paths(files);
    let mut lines = vec![TREE_TITLE.to_string(), ".".to_string()];
    render_children(&root, "", &mut lines);

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

fn render_children(node: &TreeNode, prefix: &str, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (idx, (name, child)) in node.children.iter().enumerate() {
        let is_last = idx + 1 == count;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{}{}{}", prefix, connector, name));

        if child.is_dir() {
            let extension = if is_last { SPACE_INDENT } else { PIPE_INDENT };
            render_children(child, &format!("{}{}", prefix, extension), lines);
        }
    }
}
