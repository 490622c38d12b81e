/*!
 * Reporting functionality for reposcribe
 *
 * Renders the summary of an export either as console tables (via the
 * tabled library) or as a single JSON document.
 */

use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::error::Result;
use crate::types::ExportResult;
use crate::utils::{estimate_tokens, format_file_size};
use crate::writer::ExportStatistics;

/// Files tables longer than this only show the largest entries
const MAX_LISTED_FILES: usize = 15;
const TOP_FILES: usize = 10;

/// Summary of a finished export
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to walk and export
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
    /// Counters returned by the exporter
    #[serde(flatten)]
    pub result: ExportResult,
    /// Estimated LLM tokens in the embedded contents
    pub estimated_tokens: u64,
    /// Per-file sizes, in export order
    #[serde(skip)]
    pub statistics: ExportStatistics,
}

impl ExportReport {
    pub fn new(
        output_file: String,
        duration: Duration,
        result: ExportResult,
        statistics: ExportStatistics,
    ) -> Self {
        Self {
            output_file,
            duration,
            result,
            estimated_tokens: estimate_tokens(result.total_bytes),
            statistics,
        }
    }
}

fn serialize_duration<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Format of the report output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Console table output
    #[default]
    #[value(name = "table")]
    ConsoleTable,
    /// JSON object output
    Json,
}

/// Report generator for export results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: u64) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ExportReport) -> Result<String> {
        match self.format {
            ReportFormat::ConsoleTable => Ok(self.generate_console_report(report)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ExportReport) -> Result<()> {
        println!("\n{}", self.generate_report(report)?);
        Ok(())
    }

    fn style(table: &mut Table) {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Scribed".to_string(),
                value: self.format_number(report.result.file_count as u64),
            },
        ];

        if report.result.failed_files > 0 {
            rows.push(SummaryRow {
                key: "⚠️ Failed Files".to_string(),
                value: self.format_number(report.result.failed_files as u64),
            });
        }

        rows.push(SummaryRow {
            key: "💾 Total Size".to_string(),
            value: format_file_size(report.result.total_bytes),
        });

        rows.push(SummaryRow {
            key: "📦 LLM Tokens".to_string(),
            value: format!(
                "{} tokens (estimated)",
                self.format_number(report.estimated_tokens)
            ),
        });

        let mut table = Table::new(rows);
        Self::style(&mut table);
        table.to_string()
    }

    // Create a files table using the tabled crate
    fn create_files_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Size")]
            size: String,
        }

        let mut files: Vec<_> = report.statistics.file_details.iter().collect();
        files.sort_by(|(_, a), (_, b)| b.bytes.cmp(&a.bytes));

        let files_to_show = if files.len() > MAX_LISTED_FILES {
            &files[..TOP_FILES]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|(path, info)| FileRow {
                path: truncate_path(path, 60),
                lines: self.format_number(info.lines as u64),
                size: format_file_size(info.bytes),
            })
            .collect();

        let mut table = Table::new(rows);
        Self::style(&mut table);
        table.to_string()
    }

    fn create_failures_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct FailureRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Error")]
            error: String,
        }

        let rows: Vec<FailureRow> = report
            .statistics
            .failures
            .iter()
            .map(|(path, error)| FailureRow {
                path: truncate_path(path, 60),
                error: error.clone(),
            })
            .collect();

        let mut table = Table::new(rows);
        Self::style(&mut table);
        table.to_string()
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &ExportReport) -> String {
        let files_title = if report.statistics.file_details.len() > MAX_LISTED_FILES {
            "📋  TOP 10 LARGEST FILES"
        } else {
            "📋  SCRIBED FILES"
        };

        let mut sections = vec![format!("{}\n{}", files_title, self.create_files_table(report))];

        if !report.statistics.failures.is_empty() {
            sections.push(format!(
                "⚠️  FILES THAT COULD NOT BE READ\n{}",
                self.create_failures_table(report)
            ));
        }

        sections.push(format!(
            "✅  SCRIBING COMPLETE\n{}",
            self.create_summary_table(report)
        ));

        sections.join("\n\n")
    }
}

/// Keep the trailing path segments that fit in `max_len`
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        return path.to_string();
    }

    let mut segments = Vec::new();
    let mut current_len = 3; // "..."
    for part in path.rsplit('/') {
        let part_len = part.len() + 1;
        if current_len + part_len > max_len {
            break;
        }
        segments.push(part);
        current_len += part_len;
    }

    if segments.is_empty() {
        let tail: String = path
            .chars()
            .rev()
            .take(max_len.saturating_sub(3))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        return format!("...{}", tail);
    }

    let mut result = String::from("...");
    for part in segments.iter().rev() {
        result.push('/');
        result.push_str(part);
    }
    result
}
