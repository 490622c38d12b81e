/*!
 * Directory traversal with pattern-based pruning
 */

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, ScribeError};
use crate::patterns::PatternSet;
use crate::types::FileList;
use crate::utils::to_slash_path;

/// Walker over a project root
pub struct Walker<'a> {
    /// Compiled ignore rules
    patterns: &'a PatternSet,
}

impl<'a> Walker<'a> {
    /// Create a new walker
    pub fn new(patterns: &'a PatternSet) -> Self {
        Self { patterns }
    }

    /// Collect every non-ignored regular file under `root`
    ///
    /// Ignored directories are pruned before they are read. Unreadable
    /// subtrees are skipped with a warning. The result is sorted by full path.
    pub fn walk(&self, root: &Path) -> Result<FileList> {
        if !root.is_dir() {
            return Err(ScribeError::PathNotFound(format!(
                "Project root is not a directory: {}",
                root.display()
            )));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| self.should_descend(root, entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // The root itself failing means there is nothing to export
                    if e.depth() == 0 {
                        return Err(ScribeError::Walk(e.to_string()));
                    }
                    log::warn!("Skipping unreadable path: {}", e);
                    continue;
                }
            };

            if entry.depth() == 0 || !is_regular_file(&entry) {
                continue;
            }

            let Some(rel_path) = relative_path(root, entry.path()) else {
                continue;
            };

            if self.patterns.matches(&rel_path, false) {
                log::trace!("Excluding file: {}", rel_path);
            } else {
                files.push(rel_path);
            }
        }

        files.sort();
        log::info!("Found {} exportable files under {}", files.len(), root.display());
        Ok(files)
    }

    /// Pruning decision, evaluated before a directory is read
    fn should_descend(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }

        let Some(rel_path) = relative_path(root, entry.path()) else {
            return false;
        };

        let pruned = self.patterns.matches(&format!("{}/", rel_path), true);
        if pruned {
            log::debug!("Pruning directory: {}/", rel_path);
        }
        !pruned
    }
}

/// Regular files, plus symlinks that resolve to regular files
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    if file_type.is_symlink() {
        return entry.path().is_file();
    }
    false
}

/// Root-relative forward-slash path, or `None` for names that are not UTF-8
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let slash = to_slash_path(rel);
    if slash.is_none() {
        log::warn!("Skipping path with non UTF-8 name: {}", path.display());
    }
    slash
}

/// Walk `root` with the given patterns
pub fn walk(root: &Path, patterns: &PatternSet) -> Result<FileList> {
    Walker::new(patterns).walk(root)
}
