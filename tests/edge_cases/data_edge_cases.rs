//! Edge case tests for data-related scenarios

use crate::common::{dataset, CliTestRunner};
use tabrecon::commands::CommandStatus;
use tabrecon::{reconcile, DiscrepancyKind, TabreconError};

#[test]
fn test_numeric_looking_values_compare_as_text() {
    let source = dataset(&["id", "price"], &[&["1", "1.0"], &["2", "007"]]);
    let target = dataset(&["id", "price"], &[&["1", "1"], &["2", "7"]]);

    let result = reconcile(&source, &target, "id").unwrap();
    assert_eq!(result.discrepancy_count(), 2);
    assert!(result
        .discrepancies
        .iter()
        .all(|d| d.kind == DiscrepancyKind::ValueMismatch));
}

#[test]
fn test_keys_are_matched_exactly() {
    // "01" and "1" are different identifiers; so are "a" and "A"
    let source = dataset(&["id", "v"], &[&["01", "x"], &["a", "y"]]);
    let target = dataset(&["id", "v"], &[&["1", "x"], &["A", "y"]]);

    let result = reconcile(&source, &target, "id").unwrap();
    assert_eq!(result.stats.matched_keys, 0);
    assert_eq!(result.stats.only_in_source, 2);
    assert_eq!(result.stats.only_in_target, 2);
}

#[test]
fn test_whitespace_is_significant() {
    let source = dataset(&["id", "name"], &[&["1", "Ann"]]);
    let target = dataset(&["id", "name"], &[&["1", "Ann "]]);

    let result = reconcile(&source, &target, "id").unwrap();
    assert_eq!(result.discrepancy_count(), 1);
}

#[test]
fn test_unicode_values() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("source.csv", &[vec!["id", "city"], vec!["1", "北京"], vec!["2", "Café ☕"]])
        .unwrap();
    runner
        .fixture()
        .create_csv("target.csv", &[vec!["id", "city"], vec!["1", "北京"], vec!["2", "Cafe ☕"]])
        .unwrap();

    let status = runner.validate("source.csv", "target.csv", "id").unwrap();
    assert_eq!(status, CommandStatus::DiscrepanciesFound);
    assert!(runner.report().contains("Value source: Café ☕ ; Value target: Cafe ☕"));
}

#[test]
fn test_rows_without_key_are_skipped() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv_raw("source.csv", "id,v\n1,a\n,orphan\n3,c\n")
        .unwrap();
    runner
        .fixture()
        .create_csv_raw("target.csv", "id,v\n1,a\n3,c\n,other orphan\n")
        .unwrap();

    let status = runner.validate("source.csv", "target.csv", "id").unwrap();
    assert_eq!(status, CommandStatus::Success);
}

#[test]
fn test_rows_without_key_keep_row_numbering() {
    let runner = CliTestRunner::new().unwrap();
    runner.fixture().create_csv_raw("source.csv", "id,v\n,orphan\n1,a\n").unwrap();
    runner.fixture().create_csv_raw("target.csv", "id,v\n,x\n,y\n1,b\n").unwrap();

    let status = runner.validate("source.csv", "target.csv", "id").unwrap();
    assert_eq!(status, CommandStatus::DiscrepanciesFound);
    assert_eq!(
        runner.report_body(),
        vec![
            "Validation failed!!",
            "Discrepancies found: 1",
            "Field: v ; Source Row Number: 2 ; Target Row Number: 3 ; Value source: a ; Value target: b",
        ]
    );
}

#[test]
fn test_empty_rows_keep_row_numbering() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv_raw("source.csv", "id,v\n1,a\n,\n3,c\n")
        .unwrap();
    runner
        .fixture()
        .create_csv_raw("target.csv", "id,v\n1,a\n3,changed\n")
        .unwrap();

    runner.validate("source.csv", "target.csv", "id").unwrap();
    assert!(runner.report().contains(
        "Field: v ; Source Row Number: 3 ; Target Row Number: 2 ; Value source: c ; Value target: changed\n"
    ));
}

#[test]
fn test_repeated_source_columns_report_each_cell_once() {
    let source = dataset(&["id", "a", "a"], &[&["1", "x", "y"]]);
    let target = dataset(&["id", "a"], &[&["1", "z"]]);

    let result = reconcile(&source, &target, "id").unwrap();
    let fields: Vec<_> = result
        .discrepancies
        .iter()
        .map(|d| (d.field.as_str(), d.source_value.as_str(), d.target_value.as_str()))
        .collect();
    assert_eq!(fields, vec![("a", Some("x"), Some("z")), ("a.1", Some("y"), None)]);
}

#[test]
fn test_header_only_files_pass() {
    let runner = CliTestRunner::new().unwrap();
    runner.fixture().create_csv_raw("source.csv", "id,name\n").unwrap();
    runner.fixture().create_csv_raw("target.csv", "id,name\n").unwrap();

    let status = runner.validate("source.csv", "target.csv", "id").unwrap();
    assert_eq!(status, CommandStatus::Success);
    assert!(runner.report().ends_with("Validation passed!!\n"));
}

#[test]
fn test_empty_file_has_no_key_field() {
    let runner = CliTestRunner::new().unwrap();
    runner.fixture().create_csv_raw("source.csv", "").unwrap();
    runner.fixture().create_csv_raw("target.csv", "id\n1\n").unwrap();

    let err = runner.validate("source.csv", "target.csv", "id").unwrap_err();
    assert!(matches!(err, TabreconError::MissingKeyField { .. }));
    assert!(runner
        .report()
        .contains("The unique identifier field 'id' is missing in the source file.\n"));
}

#[test]
fn test_source_only_column_reports_target_absent() {
    let source = dataset(&["id", "name", "legacy"], &[&["1", "A", "old"]]);
    let target = dataset(&["id", "name"], &[&["1", "A"]]);

    let result = reconcile(&source, &target, "id").unwrap();
    assert_eq!(result.discrepancy_count(), 1);
    let d = &result.discrepancies[0];
    assert_eq!(d.field, "legacy");
    assert_eq!(d.kind, DiscrepancyKind::TargetValueMissing);
    assert!(d.target_value.is_absent());
}

#[test]
fn test_literal_nan_text_is_a_value() {
    let source = dataset(&["id", "v"], &[&["1", "NaN"]]);
    let target = dataset(&["id", "v"], &[&["1", "NaN"]]);

    assert!(reconcile(&source, &target, "id").unwrap().passed());
}

#[test]
fn test_too_many_fields_is_a_read_error() {
    let runner = CliTestRunner::new().unwrap();
    runner.fixture().create_csv_raw("source.csv", "id,v\n1,a,b\n").unwrap();
    runner.fixture().create_csv_raw("target.csv", "id,v\n1,a\n").unwrap();

    let err = runner.validate("source.csv", "target.csv", "id").unwrap_err();
    assert!(matches!(err, TabreconError::DatasetRead { .. }));
    assert!(runner.report().contains("Error reading files: "));
}
