/*!
 * Ignore pattern collection and gitignore-style matching
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{Result, ScribeError};

/// Baseline patterns applied on every run, before any ignore file
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // Version control
    ".git/",
    ".hg/",
    ".svn/",
    ".bzr/",
    // Ignore files themselves
    ".gitignore",
    ".reposcribe_ignore",
    // Lock files
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "poetry.lock",
    "Pipfile.lock",
    "composer.lock",
    "Gemfile.lock",
    "Cargo.lock",
    "go.sum",
    // Compiled artifacts
    "*.pyc",
    "__pycache__",
    "*.class",
    "*.jar",
    "*.war",
    "*.o",
    "*.a",
    "*.so",
    "*.dll",
    "*.exe",
    // Build output
    "build/",
    "dist/",
    "target/",
    "bin/",
    "obj/",
    "out/",
    "public/build/",
    // Framework caches
    ".next/",
    ".nuxt/",
    ".svelte-kit/",
    ".vercel/",
    ".serverless/",
    ".terraform/",
    // Environment files
    ".env",
    ".env.*",
    // Virtual environments
    ".venv/",
    "venv/",
    "env/",
    // IDEs & Editors
    ".idea/",
    ".vscode/",
    "*.sublime-*",
    ".project",
    ".settings/",
    ".classpath",
    "*.swp",
    "*.swo",
    // OS Files
    ".DS_Store",
    "Thumbs.db",
    // Logs
    "*.log",
    // Test coverage
    "coverage/",
    ".coverage",
    "htmlcov/",
    "*.lcov",
    "nosetests.xml",
    "pytest.xml",
    ".pytest_cache/",
    // Media & archives
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.bmp",
    "*.svg",
    "*.mp3",
    "*.wav",
    "*.ogg",
    "*.mp4",
    "*.avi",
    "*.mov",
    "*.mkv",
    "*.webm",
    "*.pdf",
    "*.docx",
    "*.pptx",
    "*.zip",
    "*.tar",
    "*.gz",
    "*.rar",
    "*.7z",
    // Dependencies
    "node_modules/",
    "vendor/",
    "bower_components/",
    // Cloud build artifacts
    "cdk.out/",
];

/// Extract usable pattern lines from ignore file text
///
/// Lines are trimmed; blank lines and `#` comments are dropped. Order is kept.
pub fn parse_ignore_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read each ignore file in order and return the contents of those that exist
///
/// Missing, unreadable and empty files are reported and skipped.
pub fn read_ignore_files(paths: &[PathBuf]) -> Vec<String> {
    let mut contents = Vec::new();

    for path in paths {
        match fs::read(path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => {
                    if parse_ignore_lines(&text).is_empty() {
                        log::info!("Ignore file exists but empty: {}", path.display());
                    } else {
                        log::info!("Read patterns from {}", path.display());
                        contents.push(text);
                    }
                }
                Err(e) => log::warn!("Failed to decode {} as UTF-8: {}", path.display(), e),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No ignore file at {}", path.display());
            }
            Err(e) => log::warn!("Failed to read {}: {}", path.display(), e),
        }
    }

    contents
}

/// Compiled, immutable set of ordered gitignore-style patterns
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    matcher: Gitignore,
}

impl PatternSet {
    /// Compile defaults followed by the lines of each ignore file, in order
    pub fn build<S: AsRef<str>>(defaults: &[S], ignore_file_contents: &[String]) -> Result<Self> {
        let patterns = defaults
            .iter()
            .map(|p| p.as_ref().to_string())
            .chain(
                ignore_file_contents
                    .iter()
                    .flat_map(|content| parse_ignore_lines(content)),
            )
            .collect();

        Self::from_patterns(patterns)
    }

    /// Compile an already-flattened pattern list
    pub fn from_patterns(patterns: Vec<String>) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(Path::new("."));
        for pattern in &patterns {
            builder
                .add_line(None, pattern)
                .map_err(|e| ScribeError::Pattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
        }
        let matcher = builder.build().map_err(|e| ScribeError::Pattern {
            pattern: String::from("<set>"),
            message: e.to_string(),
        })?;

        log::debug!("Compiled {} ignore patterns", patterns.len());
        Ok(Self { patterns, matcher })
    }

    /// Whether a root-relative path is excluded
    ///
    /// A trailing `/` on `relative_path` is accepted as a directory hint.
    pub fn matches(&self, relative_path: &str, is_directory: bool) -> bool {
        let (path, is_dir) = match relative_path.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (relative_path, is_directory),
        };
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return false;
        }

        let matched = self.matcher.matched(Path::new(path), is_dir);
        if log::log_enabled!(log::Level::Trace) {
            if let Some(glob) = matched.inner() {
                log::trace!(
                    "{} matched by \"{}\" ({})",
                    path,
                    glob.original(),
                    if matched.is_ignore() { "ignored" } else { "re-included" }
                );
            }
        }
        matched.is_ignore()
    }

    /// Patterns in compile order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
