/*!
 * reposcribe - Scribe a repository into a single flat context file
 *
 * This library selects the non-ignored files of a project with
 * gitignore-style rules, optionally draws a file tree, and concatenates
 * every selected file between START/END markers into one text artifact
 * for use as context for Large Language Models.
 */

pub mod config;
pub mod encoding;
pub mod error;
pub mod patterns;
pub mod report;
pub mod tree;
pub mod types;
pub mod utils;
pub mod walker;
pub mod writer;


// Re-export main components for easier access
pub use config::{Args, Config};
pub use encoding::{DecodePolicy, TextEncoding};
pub use error::{Result, ScribeError};
pub use patterns::{PatternSet, DEFAULT_IGNORE_PATTERNS};
pub use report::{ExportReport, ReportFormat, Reporter};
pub use types::{ExportResult, FileList, RelativePath, TreeNode};
pub use utils::format_file_size;
pub use walker::Walker;
pub use writer::{ExportOptions, Exporter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
