/*!
 * Reporting functionality for promptpack
 *
 * Renders run summaries to the console with the tabled library: for
 * aggregate mode a summary table, the largest included files, and the
 * skipped candidates with reasons; for apply mode the applied paths and
 * accumulated warnings.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::modify::ApplyOutcome;
use crate::select::SkippedFile;

/// Information about a file in the report
#[derive(Debug, Clone, Default)]
pub struct FileReportInfo {
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
}

/// Statistics for an aggregate run
#[derive(Debug, Clone)]
pub struct AggregateReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to select, render and write
    pub duration: Duration,
    /// Per-file details, in output order
    pub file_details: Vec<(String, FileReportInfo)>,
    /// Candidates excluded from the output, with reasons
    pub skipped: Vec<SkippedFile>,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
    // Other formats could be added in the future
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Truncate a path for display, keeping the trailing segments
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.len() <= max_len {
            return path.to_string();
        }

        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() <= 2 {
            return format!("...{}", &path[path.len().saturating_sub(max_len - 3)..]);
        }

        let mut segments = Vec::new();
        let mut current_len = 3; // Start with "..."
        for part in parts.iter().rev() {
            let part_len = part.len() + 1; // +1 for '/'
            if current_len + part_len <= max_len {
                segments.push(*part);
                current_len += part_len;
            } else {
                break;
            }
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }

        result
    }

    /// Generate a report string for an aggregate run
    pub fn generate_report(&self, report: &AggregateReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the aggregate report to stdout
    pub fn print_report(&self, report: &AggregateReport) {
        println!("\n{}", self.generate_report(report));
    }

    /// Print an apply-mode report to stdout
    pub fn print_apply_report(&self, outcome: &ApplyOutcome) {
        println!("\n{}", self.generate_apply_report(outcome));
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &AggregateReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let total_lines: usize = report.file_details.iter().map(|(_, i)| i.lines).sum();
        let total_chars: usize = report.file_details.iter().map(|(_, i)| i.chars).sum();

        let rows = vec![
            SummaryRow {
                key: "Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "Files Included".to_string(),
                value: self.format_number(report.file_details.len()),
            },
            SummaryRow {
                key: "Files Skipped".to_string(),
                value: self.format_number(report.skipped.len()),
            },
            SummaryRow {
                key: "Total Lines".to_string(),
                value: self.format_number(total_lines),
            },
            SummaryRow {
                key: "Est. LLM Tokens".to_string(),
                value: format!("{} tokens (estimated)", self.format_number(total_chars / 4)),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Create a files table using the tabled crate
    fn create_files_table(&self, report: &AggregateReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        // Sort files by character count
        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|(_, a), (_, b)| b.chars.cmp(&a.chars));

        // Show all files, or just the top 10 for large runs
        let files_to_show = if report.file_details.len() > 15 {
            &files[0..10]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|(path, info)| FileRow {
                path: self.format_path(path, 60),
                lines: self.format_number(info.lines),
                tokens: self.format_number(info.chars / 4),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Create a table of skipped candidates with reasons
    fn create_skipped_table(&self, report: &AggregateReport) -> String {
        #[derive(Tabled)]
        struct SkipRow {
            #[tabled(rename = "Path")]
            path: String,

            #[tabled(rename = "Reason")]
            reason: String,
        }

        let rows: Vec<SkipRow> = report
            .skipped
            .iter()
            .map(|s| SkipRow {
                path: self.format_path(&s.path, 60),
                reason: s.reason.to_string(),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Generate a console table report for an aggregate run
    fn generate_console_report(&self, report: &AggregateReport) -> String {
        let summary_table = self.create_summary_table(report);
        let files_table = self.create_files_table(report);

        let files_title = if report.file_details.len() > 15 {
            "TOP 10 LARGEST FILES BY CHARACTER COUNT"
        } else {
            "INCLUDED FILES"
        };

        let mut out = format!(
            "{}\n{}\n\nAGGREGATION COMPLETE\n{}",
            files_title, files_table, summary_table
        );

        if !report.skipped.is_empty() {
            out.push_str(&format!(
                "\n\nSKIPPED CANDIDATES\n{}",
                self.create_skipped_table(report)
            ));
        }

        out
    }

    // Generate a console table report for an apply run
    fn generate_apply_report(&self, outcome: &ApplyOutcome) -> String {
        #[derive(Tabled)]
        struct AppliedRow {
            #[tabled(rename = "Applied Path")]
            path: String,
        }

        let rows: Vec<AppliedRow> = outcome
            .applied
            .iter()
            .map(|p| AppliedRow {
                path: self.format_path(p, 60),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        let mut out = format!(
            "APPLY COMPLETE: {} operation(s)\n{}",
            outcome.applied.len(),
            table
        );

        if !outcome.warnings.is_empty() {
            out.push_str("\n\nWarnings:");
            for warning in &outcome.warnings {
                out.push_str(&format!("\n  - {}", warning));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::SkipReason;

    fn sample_report() -> AggregateReport {
        AggregateReport {
            output_file: "prompt.txt".to_string(),
            duration: Duration::from_millis(42),
            file_details: vec![
                (
                    "src/main.rs".to_string(),
                    FileReportInfo {
                        lines: 10,
                        chars: 200,
                    },
                ),
                (
                    "README.md".to_string(),
                    FileReportInfo {
                        lines: 5,
                        chars: 80,
                    },
                ),
            ],
            skipped: vec![SkippedFile {
                path: "logo.png".to_string(),
                reason: SkipReason::Binary,
            }],
        }
    }

    #[test]
    fn test_aggregate_report_contents() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        let text = reporter.generate_report(&sample_report());

        assert!(text.contains("src/main.rs"));
        assert!(text.contains("prompt.txt"));
        assert!(text.contains("SKIPPED CANDIDATES"));
        assert!(text.contains("logo.png"));
        assert!(text.contains("binary content"));
    }

    #[test]
    fn test_apply_report_lists_warnings() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        let outcome = ApplyOutcome {
            applied: vec!["a.txt".to_string()],
            warnings: vec!["delete target not found: b.txt".to_string()],
        };

        let text = reporter.generate_apply_report(&outcome);
        assert!(text.contains("a.txt"));
        assert!(text.contains("delete target not found: b.txt"));
    }

    #[test]
    fn test_format_number_units() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        assert_eq!(reporter.format_number(999), "999");
        assert_eq!(reporter.format_number(1_500), "1.5K");
        assert_eq!(reporter.format_number(2_000_000), "2.0M");
    }
}
