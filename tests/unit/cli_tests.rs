//! Unit tests for CLI argument parsing and validation

use clap::Parser;
use std::path::PathBuf;
use tabrecon::cli::{Cli, Commands, OutputFormat};

#[test]
fn test_cli_validate_command() {
    let cli = Cli::try_parse_from(&[
        "tabrecon", "validate",
        "--source", "source.csv",
        "--target", "target.csv",
        "--key", "field1",
    ])
    .unwrap();

    match cli.command {
        Commands::Validate {
            source,
            target,
            key_field,
            report,
            config,
            delimiter,
            allow_duplicate_keys,
            format,
        } => {
            assert_eq!(source, Some(PathBuf::from("source.csv")));
            assert_eq!(target, Some(PathBuf::from("target.csv")));
            assert_eq!(key_field.as_deref(), Some("field1"));
            assert!(report.is_none());
            assert!(config.is_none());
            assert!(delimiter.is_none());
            assert!(!allow_duplicate_keys);
            assert_eq!(format, "pretty");
        }
        _ => panic!("Expected Validate command"),
    }
}

#[test]
fn test_cli_validate_command_with_options() {
    let cli = Cli::try_parse_from(&[
        "tabrecon", "validate",
        "--config", "recon.json",
        "--report", "out/report.txt",
        "--delimiter", ";",
        "--allow-duplicate-keys",
        "--format", "json",
    ])
    .unwrap();

    match cli.command {
        Commands::Validate {
            source,
            report,
            config,
            delimiter,
            allow_duplicate_keys,
            format,
            ..
        } => {
            assert!(source.is_none());
            assert_eq!(report, Some(PathBuf::from("out/report.txt")));
            assert_eq!(config, Some(PathBuf::from("recon.json")));
            assert_eq!(delimiter, Some(';'));
            assert!(allow_duplicate_keys);
            assert_eq!(format, "json");
        }
        _ => panic!("Expected Validate command"),
    }
}

#[test]
fn test_cli_checksum_command() {
    let cli = Cli::try_parse_from(&["tabrecon", "checksum", "data"]).unwrap();
    match cli.command {
        Commands::Checksum { dir, output, algorithm } => {
            assert_eq!(dir, PathBuf::from("data"));
            assert_eq!(output, PathBuf::from("checksums.txt"));
            assert_eq!(algorithm, "sha256");
        }
        _ => panic!("Expected Checksum command"),
    }
}

#[test]
fn test_cli_checksum_command_with_options() {
    let cli = Cli::try_parse_from(&[
        "tabrecon", "checksum", "data",
        "--output", "listings/today.txt",
        "--algorithm", "blake3",
    ])
    .unwrap();
    match cli.command {
        Commands::Checksum { output, algorithm, .. } => {
            assert_eq!(output, PathBuf::from("listings/today.txt"));
            assert_eq!(algorithm, "blake3");
        }
        _ => panic!("Expected Checksum command"),
    }
}

#[test]
fn test_cli_compare_command() {
    let cli = Cli::try_parse_from(&["tabrecon", "compare", "old.txt", "new.txt"]).unwrap();
    match cli.command {
        Commands::Compare { previous, current, log } => {
            assert_eq!(previous, PathBuf::from("old.txt"));
            assert_eq!(current, PathBuf::from("new.txt"));
            assert_eq!(log, PathBuf::from("checksum_comparison_log.txt"));
        }
        _ => panic!("Expected Compare command"),
    }
}

#[test]
fn test_cli_compare_requires_two_listings() {
    assert!(Cli::try_parse_from(&["tabrecon", "compare", "old.txt"]).is_err());
}

#[test]
fn test_cli_global_flags() {
    let cli = Cli::try_parse_from(&["tabrecon", "--verbose", "checksum", "data"]).unwrap();
    assert!(cli.verbose);
    assert!(!cli.no_progress);

    let cli = Cli::try_parse_from(&["tabrecon", "checksum", "data", "--no-progress", "-v"]).unwrap();
    assert!(cli.verbose);
    assert!(cli.no_progress);
}

#[test]
fn test_cli_invalid_delimiter() {
    let result = Cli::try_parse_from(&["tabrecon", "validate", "--delimiter", "||"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_tab_delimiter() {
    let cli = Cli::try_parse_from(&["tabrecon", "validate", "--delimiter", "tab"]).unwrap();
    match cli.command {
        Commands::Validate { delimiter, .. } => assert_eq!(delimiter, Some('\t')),
        _ => panic!("Expected Validate command"),
    }
}

#[test]
fn test_cli_unknown_command() {
    assert!(Cli::try_parse_from(&["tabrecon", "snapshot", "data.csv"]).is_err());
}

#[test]
fn test_output_format_parsing() {
    assert!(matches!(OutputFormat::parse("pretty"), Ok(OutputFormat::Pretty)));
    assert!(matches!(OutputFormat::parse("Pretty"), Ok(OutputFormat::Pretty)));
    assert!(matches!(OutputFormat::parse("json"), Ok(OutputFormat::Json)));

    let err = OutputFormat::parse("yaml").unwrap_err();
    assert!(err.contains("yaml"));
}
