//! Comparison of a previous checksum listing against a current one

use crate::checksum::ChecksumListing;
use serde::Serialize;

const RULE_WIDTH: usize = 60;

/// A listed file that did not pass, with its line in the previous listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub line: usize,
}

/// Outcome of comparing two listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChecksumComparison {
    /// False when either listing had no entries
    pub comparable: bool,
    pub passed: usize,
    pub failed: Vec<FileFailure>,
    pub missing: Vec<FileFailure>,
    pub total_files: usize,
    /// Problems met while reading the listings
    pub notes: Vec<String>,
}

impl ChecksumComparison {
    pub fn failed_count(&self) -> usize {
        self.failed.len() + self.missing.len()
    }

    pub fn is_clean(&self) -> bool {
        self.comparable && self.failed_count() == 0
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

/// Check every file of `previous` against `current`, in previous-listing order
pub fn compare_listings(previous: &ChecksumListing, current: &ChecksumListing) -> ChecksumComparison {
    let mut comparison = ChecksumComparison {
        total_files: previous.len(),
        ..ChecksumComparison::default()
    };

    for (label, listing) in [("previous", previous), ("current", current)] {
        for invalid in listing.invalid_lines() {
            comparison.add_note(format!(
                "Invalid format in {} listing line {}: {}",
                label, invalid.line, invalid.content
            ));
        }
    }

    if previous.is_empty() || current.is_empty() {
        return comparison;
    }
    comparison.comparable = true;

    for (path, entry) in previous.entries() {
        match current.get(path) {
            Some(now) if now.digest == entry.digest => comparison.passed += 1,
            Some(_) => comparison.failed.push(FileFailure {
                path: path.to_string(),
                line: entry.line,
            }),
            None => comparison.missing.push(FileFailure {
                path: path.to_string(),
                line: entry.line,
            }),
        }
    }

    log::debug!(
        "Checksum comparison: {} passed, {} failed, {} missing",
        comparison.passed,
        comparison.failed.len(),
        comparison.missing.len()
    );
    comparison
}

/// Render the comparison log
pub fn format_comparison_log(comparison: &ChecksumComparison) -> String {
    let mut lines: Vec<String> = comparison.notes.clone();

    if comparison.comparable {
        lines.push("\nFailed checksum comparisons:".to_string());
        lines.extend(comparison.failed.iter().map(failure_line));
        lines.push("\nMissing File Lines:".to_string());
        lines.extend(comparison.missing.iter().map(failure_line));
    } else {
        lines.push("Cannot compare checksums. Checksums files are missing or empty.\n\n".to_string());
    }

    let dash = "-".repeat(RULE_WIDTH);
    let summary = format!(
        "\nSUMMARY: ==>  PASSED: {}, FAILED: {}, TOTAL FILES: {} \n",
        comparison.passed,
        comparison.failed_count(),
        comparison.total_files
    );

    lines.push("\n".to_string());
    lines.push(dash.clone());
    lines.push(dash.clone());
    lines.push(format!("{:#^width$}", " TEST REPORT ", width = RULE_WIDTH));
    lines.push(summary);
    lines.push(dash.clone());
    lines.push(dash);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn failure_line(failure: &FileFailure) -> String {
    format!("{}: FAILED (Line {})", failure.path, failure.line)
}
