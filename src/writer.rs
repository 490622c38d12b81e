/*!
 * Flat text export writer for reposcribe
 */

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;

use crate::encoding::{normalize_newlines, DecodePolicy, TextEncoding};
use crate::error::{Result, ScribeError};
use crate::tree;
use crate::types::ExportResult;

pub const TREE_START: &str = "--- START FILE TREE ---";
pub const TREE_END: &str = "--- END FILE TREE ---";

/// Prefix of the inline line that replaces unreadable content
pub const READ_ERROR_PREFIX: &str = "Error reading file:";

/// Options controlling how files are read and the artifact is written
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// Encoding used for both source files and the artifact
    pub encoding: TextEncoding,
    /// Handling of bytes or characters that do not fit the encoding
    pub errors: DecodePolicy,
    /// Write the tree block before file contents
    pub include_tree: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Utf8,
            errors: DecodePolicy::Ignore,
            include_tree: true,
        }
    }
}

/// Per-file figures kept for reporting
#[derive(Debug, Clone, Default)]
pub struct FileReportInfo {
    /// Number of lines in the embedded content
    pub lines: usize,
    /// Encoded size of the embedded content
    pub bytes: u64,
}

/// Statistics gathered during an export
#[derive(Debug, Clone, Default)]
pub struct ExportStatistics {
    /// Successfully embedded files, in export order
    pub file_details: Vec<(String, FileReportInfo)>,
    /// Files that were replaced by an inline error, with the message
    pub failures: Vec<(String, String)>,
}

/// Writer of the flat export artifact
pub struct Exporter {
    /// Exporter configuration
    options: ExportOptions,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    /// Exporter statistics
    statistics: ExportStatistics,
}

impl Exporter {
    /// Create a new exporter
    pub fn new(options: ExportOptions, progress: Arc<ProgressBar>) -> Self {
        Self {
            options,
            progress,
            statistics: ExportStatistics::default(),
        }
    }

    /// Statistics of the last export
    pub fn statistics(&self) -> &ExportStatistics {
        &self.statistics
    }

    /// Export `files` into a newly created file at `output`
    ///
    /// The output is flushed and closed before returning, whether or not any
    /// write failed.
    pub fn export_to_path(
        &mut self,
        output: &Path,
        project_root: &Path,
        files: &[String],
    ) -> Result<ExportResult> {
        let output_error = |source: io::Error| ScribeError::Output {
            path: output.to_path_buf(),
            source,
        };

        let file = File::create(output).map_err(output_error)?;
        let mut writer = BufWriter::new(file);

        let written = self.export(&mut writer, project_root, files);
        let flushed = writer.flush();

        let result = written.map_err(output_error)?;
        flushed.map_err(output_error)?;

        log::info!(
            "Wrote {} files ({} bytes) to {}",
            result.file_count,
            result.total_bytes,
            output.display()
        );
        Ok(result)
    }

    /// Export `files` into any writer
    ///
    /// Only failures of `out` are returned; unreadable source files are
    /// recorded inline and counted as failures.
    pub fn export<W: Write>(
        &mut self,
        out: &mut W,
        project_root: &Path,
        files: &[String],
    ) -> io::Result<ExportResult> {
        self.statistics = ExportStatistics::default();
        let mut result = ExportResult::default();

        if self.options.include_tree {
            self.write_text(out, &format!("{}\n", TREE_START))?;
            self.write_text(out, &tree::render(files))?;
            self.write_text(out, &format!("{}\n\n", TREE_END))?;
        }

        for rel_path in files {
            self.progress.set_message(format!("Scribing: {}", rel_path));
            log::debug!("Scribing: {}", rel_path);

            self.write_text(out, &format!("--- START FILE: {} ---\n", rel_path))?;

            match self.read_file(project_root, rel_path) {
                Ok((content, lines)) => {
                    out.write_all(&content)?;
                    result.file_count += 1;
                    result.total_bytes += content.len() as u64;
                    self.statistics.file_details.push((
                        rel_path.clone(),
                        FileReportInfo {
                            lines,
                            bytes: content.len() as u64,
                        },
                    ));
                }
                Err(e) => {
                    log::warn!("{} read failed: {}", rel_path, e);
                    self.write_text(out, &format!("{} {}\n", READ_ERROR_PREFIX, e))?;
                    result.failed_files += 1;
                    self.statistics
                        .failures
                        .push((rel_path.clone(), e.to_string()));
                }
            }

            self.write_text(out, &format!("\n--- END FILE: {} ---\n\n", rel_path))?;
            self.progress.inc(1);
        }

        Ok(result)
    }

    /// Read, decode and re-encode one source file
    ///
    /// Returns the encoded bytes and the number of lines they hold.
    fn read_file(&self, project_root: &Path, rel_path: &str) -> Result<(Vec<u8>, usize)> {
        let full_path = source_path(project_root, rel_path);
        let bytes = fs::read(&full_path).map_err(|source| ScribeError::FileRead {
            path: full_path.clone(),
            source,
        })?;

        let text = self.options.encoding.decode(&bytes, self.options.errors)?;
        let text = normalize_newlines(&text);
        let encoded = self.options.encoding.encode(&text, self.options.errors)?;

        Ok((encoded, text.lines().count()))
    }

    /// Write structural text; characters the encoding cannot hold become `?`
    fn write_text<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        let bytes = self
            .options
            .encoding
            .encode(text, DecodePolicy::Replace)
            .map_err(io::Error::from)?;
        out.write_all(&bytes)
    }
}

/// Host path of a root-relative `/` path
fn source_path(project_root: &Path, rel_path: &str) -> PathBuf {
    rel_path
        .split('/')
        .fold(project_root.to_path_buf(), |path, part| path.join(part))
}

/// Export `files` to `output` with a hidden progress bar
pub fn export(
    output: &Path,
    project_root: &Path,
    files: &[String],
    encoding: TextEncoding,
    errors: DecodePolicy,
    include_tree: bool,
) -> Result<ExportResult> {
    let options = ExportOptions {
        encoding,
        errors,
        include_tree,
    };
    Exporter::new(options, Arc::new(ProgressBar::hidden())).export_to_path(
        output,
        project_root,
        files,
    )
}
