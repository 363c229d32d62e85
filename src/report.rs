//! Plain-text validation report
//!
//! The layout is consumed by existing tooling and must stay byte-stable:
//! same result and timestamp, same output.

use crate::dataset::FieldValue;
use crate::engine::{Discrepancy, ValidationResult};
use crate::error::TabreconError;
use chrono::NaiveDateTime;

/// Rendering of an absent row number or value
pub const ABSENT_MARKER: &str = "NaN";

const BANNER: &str = "*****R E P O R T*****\n*********************\n";

/// Timestamp layout used in report headers
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Render the full report for a completed reconciliation
pub fn format_report(result: &ValidationResult, generated_at: NaiveDateTime) -> String {
    let mut out = header(generated_at);

    if result.passed() {
        out.push_str("Validation passed!!\n");
        return out;
    }

    out.push_str("Validation failed!!\n");
    out.push_str(&format!("Discrepancies found: {}\n", result.discrepancy_count()));
    for discrepancy in &result.discrepancies {
        out.push_str(&format_discrepancy(discrepancy));
        out.push('\n');
    }
    out
}

/// Render a report for a run that was refused before comparing anything
pub fn format_error_report(error: &TabreconError, generated_at: NaiveDateTime) -> String {
    let mut out = header(generated_at);
    out.push_str("Validation failed!!\n");

    let detail = match error {
        TabreconError::MissingKeyField { field, side } => format!(
            "The unique identifier field '{}' is missing in the {} file.",
            field, side
        ),
        TabreconError::DuplicateKey {
            side,
            key,
            first_row,
            duplicate_row,
        } => format!(
            "The unique identifier '{}' is duplicated in the {} file (rows {} and {}).",
            key, side, first_row, duplicate_row
        ),
        other => format!("Error reading files: {}", other),
    };
    out.push_str(&detail);
    out.push('\n');
    out
}

/// One report body line
pub fn format_discrepancy(d: &Discrepancy) -> String {
    format!(
        "Field: {} ; Source Row Number: {} ; Target Row Number: {} ; Value source: {} ; Value target: {}",
        d.field,
        render_row(d.source_row),
        render_row(d.target_row),
        render_value(&d.source_value),
        render_value(&d.target_value),
    )
}

/// Short terminal summary
pub fn summary_line(result: &ValidationResult) -> String {
    if result.passed() {
        "Validation passed!! - No discrepancies found".to_string()
    } else {
        format!(
            "Validation failed! - {} discrepancies found.",
            result.discrepancy_count()
        )
    }
}

fn header(generated_at: NaiveDateTime) -> String {
    format!(
        "{}Generated: {}\n",
        BANNER,
        generated_at.format(TIMESTAMP_FORMAT)
    )
}

fn render_row(row: Option<usize>) -> String {
    row.map_or_else(|| ABSENT_MARKER.to_string(), |n| n.to_string())
}

fn render_value(value: &FieldValue) -> &str {
    value.as_str().unwrap_or(ABSENT_MARKER)
}
