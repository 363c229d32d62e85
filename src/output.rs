//! Terminal and JSON output

use crate::audit::ChecksumComparison;
use crate::engine::ValidationResult;
use crate::error::Result;
use crate::report;
use chrono::NaiveDateTime;

/// Number of discrepancies previewed on the terminal
const PREVIEW_LIMIT: usize = 5;

/// Pretty printer for tabrecon output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the outcome of a validation run
    pub fn print_validation_results(result: &ValidationResult, report_path: &std::path::Path) {
        println!("{}", report::summary_line(result));

        let stats = &result.stats;
        println!("├─ Key field: {}", result.key_field);
        println!(
            "├─ Records: {} source, {} target",
            stats.source_records, stats.target_records
        );
        println!("├─ Matched keys: {}", stats.matched_keys);

        if stats.only_in_source > 0 || stats.only_in_target > 0 {
            println!(
                "├─ ❌ Unmatched keys: {} only in source, {} only in target",
                stats.only_in_source, stats.only_in_target
            );
        }

        let excluded = stats.source_excluded_no_key + stats.target_excluded_no_key;
        if excluded > 0 {
            println!("├─ Skipped records without a key: {}", excluded);
        }

        if !result.passed() {
            println!("├─ First discrepancies:");
            for d in result.discrepancies.iter().take(PREVIEW_LIMIT) {
                println!("│  └─ {}", report::format_discrepancy(d));
            }
            if result.discrepancy_count() > PREVIEW_LIMIT {
                println!(
                    "│  └─ ... and {} more",
                    result.discrepancy_count() - PREVIEW_LIMIT
                );
            }
        }

        println!("└─ Please check the report file at: {}", report_path.display());
    }

    /// Print the outcome of a checksum comparison
    pub fn print_checksum_comparison(comparison: &ChecksumComparison, log_path: &std::path::Path) {
        if !comparison.comparable {
            println!("❌ Cannot compare checksums. Checksums files are missing or empty.");
        } else if comparison.is_clean() {
            println!("✅ All {} files passed", comparison.passed);
        } else {
            println!("❌ Checksum comparison failed");
        }

        println!("├─ Passed: {}", comparison.passed);
        println!("├─ Failed: {}", comparison.failed.len());
        println!("├─ Missing: {}", comparison.missing.len());
        println!("└─ Log: {}", log_path.display());
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format a validation result with its run metadata
    pub fn format_validation_results(
        result: &ValidationResult,
        generated_at: NaiveDateTime,
    ) -> Result<String> {
        let json = serde_json::json!({
            "generated_at": generated_at,
            "passed": result.passed(),
            "discrepancy_count": result.discrepancy_count(),
            "key_field": result.key_field,
            "stats": result.stats,
            "discrepancies": result.discrepancies,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }
}
