//! Integration tests for the checksum and compare commands

use crate::common::CliTestRunner;
use std::fs;
use tabrecon::checksum::ChecksumListing;
use tabrecon::commands::CommandStatus;

fn populate(runner: &CliTestRunner) {
    let root = runner.fixture().root().join("data");
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::write(root.join("one.csv"), "id,v\n1,a\n").unwrap();
    fs::write(root.join("two.csv"), "id,v\n2,b\n").unwrap();
    fs::write(root.join("nested").join("three.csv"), "id,v\n3,c\n").unwrap();
}

fn generate(runner: &CliTestRunner, output: &str) {
    let dir = runner.fixture().path_str("data");
    let output = runner.fixture().path_str(output);
    let status = runner.expect_success(&["checksum", &dir, "--output", &output]);
    assert_eq!(status, CommandStatus::Success);
}

fn compare(runner: &CliTestRunner, previous: &str, current: &str) -> CommandStatus {
    let previous = runner.fixture().path_str(previous);
    let current = runner.fixture().path_str(current);
    let log = runner.fixture().path_str("comparison.log");
    runner.expect_success(&["compare", &previous, &current, "--log", &log])
}

#[test]
fn test_checksum_lists_every_file() {
    let runner = CliTestRunner::new().unwrap();
    populate(&runner);
    generate(&runner, "checksums.txt");

    let listing = ChecksumListing::parse(&runner.fixture().read("checksums.txt"));
    assert_eq!(listing.len(), 3);
    assert!(listing.invalid_lines().is_empty());
    for (path, entry) in listing.entries() {
        assert!(path.ends_with(".csv"));
        assert_eq!(entry.digest.len(), 64);
    }
}

#[test]
fn test_unchanged_tree_compares_clean() {
    let runner = CliTestRunner::new().unwrap();
    populate(&runner);
    generate(&runner, "before.txt");
    generate(&runner, "after.txt");

    assert_eq!(compare(&runner, "before.txt", "after.txt"), CommandStatus::Success);
    let log = runner.fixture().read("comparison.log");
    assert!(log.contains("SUMMARY: ==>  PASSED: 3, FAILED: 0, TOTAL FILES: 3 \n"));
}

#[test]
fn test_modified_and_removed_files_fail() {
    let runner = CliTestRunner::new().unwrap();
    populate(&runner);
    generate(&runner, "before.txt");

    let root = runner.fixture().root().join("data");
    fs::write(root.join("two.csv"), "id,v\n2,changed\n").unwrap();
    fs::remove_file(root.join("nested").join("three.csv")).unwrap();
    generate(&runner, "after.txt");

    let status = compare(&runner, "before.txt", "after.txt");
    assert_eq!(status, CommandStatus::DiscrepanciesFound);
    assert_eq!(status.exit_code(), 1);

    let log = runner.fixture().read("comparison.log");
    assert!(log.contains("two.csv: FAILED (Line "));
    assert!(log.contains("three.csv: FAILED (Line "));
    assert!(log.contains("PASSED: 1, FAILED: 2, TOTAL FILES: 3"));
}

#[test]
fn test_missing_listing_is_not_comparable() {
    let runner = CliTestRunner::new().unwrap();
    populate(&runner);
    generate(&runner, "before.txt");

    let status = compare(&runner, "before.txt", "never_written.txt");
    assert_eq!(status, CommandStatus::DiscrepanciesFound);

    let log = runner.fixture().read("comparison.log");
    assert!(log.starts_with("Checksums file not found: "));
    assert!(log.contains("Cannot compare checksums. Checksums files are missing or empty."));
}

#[test]
fn test_invalid_listing_lines_are_logged() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv_raw("before.txt", "/d/a.csv: 01\nnot a checksum line\n")
        .unwrap();
    runner.fixture().create_csv_raw("after.txt", "/d/a.csv: 01\n").unwrap();

    assert_eq!(compare(&runner, "before.txt", "after.txt"), CommandStatus::Success);
    let log = runner.fixture().read("comparison.log");
    assert!(log.starts_with("Invalid format in previous listing line 2: not a checksum line\n"));
}

#[test]
fn test_checksum_rejects_unknown_algorithm() {
    let runner = CliTestRunner::new().unwrap();
    populate(&runner);

    let dir = runner.fixture().path_str("data");
    let err = runner.expect_failure(&["checksum", &dir, "--algorithm", "md5"]);
    assert!(err.to_string().contains("md5"));
}

#[test]
fn test_checksum_blake3() {
    let runner = CliTestRunner::new().unwrap();
    populate(&runner);

    let dir = runner.fixture().path_str("data");
    let output = runner.fixture().path_str("b3.txt");
    runner.expect_success(&["checksum", &dir, "--output", &output, "--algorithm", "blake3"]);

    let listing = ChecksumListing::parse(&runner.fixture().read("b3.txt"));
    let (path, entry) = listing.entries().next().unwrap();
    let expected = blake3::hash(&fs::read(path).unwrap()).to_hex().to_string();
    assert_eq!(entry.digest, expected);
}
