//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: coloured messages,
//! the progress bar shown while renaming and the end-of-run summary.

use crate::planner::{ApplyReport, RenamePlan};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use tracknorm::output::OutputFormatter;
    /// OutputFormatter::success("Normalization complete!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for `total` renames.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");

        let pb = ProgressBar::new(total);
        pb.set_style(style);
        pb
    }

    /// Prints the counts for a run.
    pub fn summary(plan: &RenamePlan, report: Option<&ApplyReport>) {
        Self::header("SUMMARY");

        let mut rows = vec![
            ("Planned", plan.entries.len()),
            ("Unchanged", plan.unchanged.len()),
        ];
        if let Some(report) = report {
            rows.push(("Renamed", report.renamed_files));
            rows.push(("Skipped", report.skipped_files.len()));
            rows.push(("Failed", report.failed_renames.len()));
        }

        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, count) in rows {
            let file_word = if count == 1 { "file" } else { "files" };
            let count = match label {
                "Failed" | "Skipped" if count > 0 => count.to_string().red(),
                _ => count.to_string().green(),
            };
            println!("{:<width$} | {} {}", label, count, file_word, width = width);
        }
    }
}
