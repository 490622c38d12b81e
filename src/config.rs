/*!
 * Configuration handling for reposcribe
 */

use std::env;
use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;

use crate::encoding::{DecodePolicy, TextEncoding};
use crate::error::Result;
use crate::report::ReportFormat;
use crate::utils::to_slash_path;
use crate::writer::ExportOptions;
use crate::{bail, ensure};

/// Name of the directory that receives default output files
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Project-level ignore file read after `.gitignore`
pub const SCRIBE_IGNORE_FILE: &str = ".reposcribe_ignore";

/// Command-line arguments for reposcribe
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "reposcribe",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scribes a repository's non-ignored files into a single context file, respecting .gitignore.",
    long_about = "Gathers the non-ignored files of PROJECT_DIR, optionally draws a file tree, and concatenates every file between START/END markers into OUTPUT_FILE."
)]
pub struct Args {
    /// Path to the project root directory to scribe
    #[clap(required_unless_present = "generate")]
    pub project_dir: Option<PathBuf>,

    /// Path to the output file [default: ./output/{project_name}_context.txt]
    pub output_file: Option<PathBuf>,

    /// Encoding for reading files and writing the output
    #[clap(short = 'e', long, value_enum, default_value_t = TextEncoding::default())]
    pub encoding: TextEncoding,

    /// How to handle file read encoding errors
    #[clap(long, value_enum, default_value_t = DecodePolicy::default())]
    pub errors: DecodePolicy,

    /// Include a file tree (default)
    #[clap(long = "tree", overrides_with = "no_tree")]
    pub tree: bool,

    /// Exclude the file tree
    #[clap(long = "no-tree")]
    pub no_tree: bool,

    /// Skip confirmation prompt
    #[clap(short = 'y', long)]
    pub yes: bool,

    /// Additional ignore files, read after .gitignore and .reposcribe_ignore
    #[clap(long = "ignore-file", value_name = "PATH")]
    pub ignore_files: Vec<PathBuf>,

    /// Comma-separated list of extra patterns to ignore, applied last
    #[clap(long = "ignore", value_delimiter = ',')]
    pub ignore_patterns: Vec<String>,

    /// Summary format
    #[clap(long, value_enum, default_value_t = ReportFormat::default())]
    pub report: ReportFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Silence logs and the progress bar
    #[clap(short, long)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Project root to export
    pub project_root: PathBuf,

    /// Output file path
    pub output_file: PathBuf,

    /// Whether the output file path came from the built-in default
    pub default_output: bool,

    /// Ignore files, read in order after the defaults
    pub ignore_files: Vec<PathBuf>,

    /// Extra patterns appended after every ignore file
    pub ignore_patterns: Vec<String>,

    /// Encoding for source files and output
    pub encoding: TextEncoding,

    /// Decode error policy
    pub errors: DecodePolicy,

    /// Whether to write the tree block
    pub include_tree: bool,

    /// Skip the confirmation prompt
    pub assume_yes: bool,

    /// Summary format
    pub report: ReportFormat,
}

impl Config {
    /// Create configuration from command-line arguments
    ///
    /// Relative paths are resolved against the current directory.
    pub fn from_args(args: Args) -> Result<Self> {
        let Some(project_dir) = args.project_dir else {
            bail!(InvalidArgument, "PROJECT_DIR is required");
        };

        let cwd = env::current_dir()?;
        let project_root = absolutize(&cwd, &project_dir);

        let (output_file, default_output) = match args.output_file {
            Some(path) => (absolutize(&cwd, &path), false),
            None => (default_output_path(&cwd, &project_root), true),
        };

        let mut ignore_files = vec![
            project_root.join(".gitignore"),
            project_root.join(SCRIBE_IGNORE_FILE),
        ];
        ignore_files.extend(args.ignore_files.iter().map(|p| absolutize(&cwd, p)));

        Ok(Self {
            project_root,
            output_file,
            default_output,
            ignore_files,
            ignore_patterns: args.ignore_patterns,
            encoding: args.encoding,
            errors: args.errors,
            include_tree: !args.no_tree || args.tree,
            assume_yes: args.yes,
            report: args.report,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.project_root.is_dir(),
            PathNotFound,
            "Project directory not found: {}",
            self.project_root.display()
        );

        ensure!(
            !self.output_file.is_dir(),
            Config,
            "Output path is a directory: {}",
            self.output_file.display()
        );

        // The default output directory is created on demand
        if !self.default_output {
            if let Some(parent) = self.output_file.parent() {
                ensure!(
                    parent.as_os_str().is_empty() || parent.is_dir(),
                    PathNotFound,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        Ok(())
    }

    /// Root-anchored pattern for the output file when it lies inside the project
    pub fn output_ignore_pattern(&self) -> Option<String> {
        if self.output_file == self.project_root {
            return None;
        }
        let rel = self.output_file.strip_prefix(&self.project_root).ok()?;
        let rel = to_slash_path(rel)?;
        if rel.is_empty() || rel.starts_with("..") {
            return None;
        }
        Some(format!("/{}", escape_glob(&rel)))
    }

    /// Options handed to the exporter
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            encoding: self.encoding,
            errors: self.errors,
            include_tree: self.include_tree,
        }
    }
}

/// `./output/<project name>_context.txt` under `cwd`
pub fn default_output_path(cwd: &Path, project_root: &Path) -> PathBuf {
    let name = project_root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| String::from("project"));
    cwd.join(DEFAULT_OUTPUT_DIR)
        .join(format!("{}_context.txt", name))
}

/// Backslash-escape glob metacharacters so `path` only matches itself
fn escape_glob(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for ch in path.chars() {
        if matches!(ch, '\\' | '*' | '?' | '[' | ']' | '{' | '}') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Make `path` absolute and drop `.` and `..` components lexically
fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
