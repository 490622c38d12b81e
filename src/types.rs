/*!
 * Core types and data structures for reposcribe
 */

use std::collections::BTreeMap;

use serde::Serialize;

/// Root-relative path using `/` separators, no leading or trailing slash
pub type RelativePath = String;

/// Sorted list of files selected for export
pub type FileList = Vec<RelativePath>;

/// Outcome of an export run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportResult {
    /// Files whose contents were embedded
    pub file_count: usize,
    /// Encoded size of the embedded contents in bytes
    pub total_bytes: u64,
    /// Files replaced by an inline read error
    pub failed_files: usize,
}

/// Node of the in-memory tree built for rendering
///
/// Directories only come from file paths, so a node without children is a
/// file and a node with children is a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    /// Child entries, kept in name order
    pub children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    /// Build the root of the hierarchy for a list of relative paths
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Self {
        let mut root = TreeNode::default();

        for path in paths {
            let mut node = &mut root;
            for part in path.as_ref().split('/').filter(|p| !p.is_empty()) {
                node = node.children.entry(part.to_string()).or_default();
            }
        }

        root
    }

    /// Whether this node stands for a directory
    pub fn is_dir(&self) -> bool {
        !self.children.is_empty()
    }
}
