//! Command implementations for tabrecon CLI

use crate::audit::{compare_listings, format_comparison_log};
use crate::checksum::{ChecksumAlgorithm, ChecksumGenerator, ChecksumListing};
use crate::cli::{Commands, OutputFormat};
use crate::config::{ValidationConfig, ValidationSettings};
use crate::engine::{DuplicateKeyPolicy, Reconciler, ValidationResult};
use crate::error::{Result, TabreconError};
use crate::loader::DatasetLoader;
use crate::output::{JsonFormatter, PrettyPrinter};
use crate::progress::ProgressReporter;
use crate::report;
use chrono::Local;
use std::fs;
use std::path::Path;

/// How a successfully executed command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Everything matched
    Success,
    /// The command ran but found discrepancies or failed checksums
    DiscrepanciesFound,
}

impl CommandStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::DiscrepanciesFound => 1,
        }
    }
}

/// Execute a command
pub fn execute_command(command: Commands, show_progress: bool) -> Result<CommandStatus> {
    match command {
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
            let overrides = ValidationConfig {
                source,
                target,
                report,
                key_field,
                delimiter,
                duplicate_keys: allow_duplicate_keys.then_some(DuplicateKeyPolicy::KeepFirst),
            };
            validate_command(config.as_deref(), overrides, &format, show_progress)
        }
        Commands::Checksum {
            dir,
            output,
            algorithm,
        } => checksum_command(&dir, &output, &algorithm, show_progress),
        Commands::Compare {
            previous,
            current,
            log,
        } => compare_command(&previous, &current, &log),
    }
}

/// Validate a target dataset against a source dataset and write the report
fn validate_command(
    config_path: Option<&Path>,
    overrides: ValidationConfig,
    format: &str,
    show_progress: bool,
) -> Result<CommandStatus> {
    let output_format = OutputFormat::parse(format).map_err(|e| TabreconError::invalid_input(e))?;

    let file_config = match config_path {
        Some(path) => ValidationConfig::load(path)?,
        None => ValidationConfig::default(),
    };
    let settings = file_config.merge(overrides).resolve()?;
    let generated_at = Local::now().naive_local();

    let mut progress = if show_progress {
        ProgressReporter::new_for_validation()
    } else {
        ProgressReporter::new_minimal()
    };

    match run_validation(&settings, &mut progress) {
        Ok(result) => {
            write_output_file(&settings.report, &report::format_report(&result, generated_at))?;
            log::info!("Report written to {}", settings.report.display());

            match output_format {
                OutputFormat::Pretty => PrettyPrinter::print_validation_results(&result, &settings.report),
                OutputFormat::Json => {
                    println!("{}", JsonFormatter::format_validation_results(&result, generated_at)?)
                }
            }

            Ok(if result.passed() {
                CommandStatus::Success
            } else {
                CommandStatus::DiscrepanciesFound
            })
        }
        Err(e) if e.is_reportable() => {
            progress.finish_all("Validation aborted");
            write_output_file(&settings.report, &report::format_error_report(&e, generated_at))?;
            println!("Validation failed! Please check the report file for details.");
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Load both datasets and reconcile them
pub fn run_validation(
    settings: &ValidationSettings,
    progress: &mut ProgressReporter,
) -> Result<ValidationResult> {
    let loader = DatasetLoader::new(settings.delimiter);

    progress.update_loading("Loading source dataset...");
    let source = loader.load_file(&settings.source)?;
    progress.update_loading("Loading target dataset...");
    let target = loader.load_file(&settings.target)?;
    progress.finish_loading(&format!(
        "Loaded {} source and {} target records",
        source.len(),
        target.len()
    ));

    let result = Reconciler::new(settings.reconcile_options()).reconcile(&source, &target)?;
    let elapsed = progress.elapsed();
    progress.finish_compare(&format!(
        "Compared {} matched records in {:.2?}",
        result.stats.matched_keys, elapsed
    ));

    Ok(result)
}

/// Generate a checksum listing for a directory tree
fn checksum_command(
    dir: &Path,
    output: &Path,
    algorithm: &str,
    show_progress: bool,
) -> Result<CommandStatus> {
    let algorithm = ChecksumAlgorithm::parse(algorithm).map_err(|e| TabreconError::invalid_input(e))?;

    let mut progress = if show_progress {
        ProgressReporter::new_for_checksums()
    } else {
        ProgressReporter::new_minimal()
    };

    println!("🔐 Generating {} checksums for '{}'...", algorithm, dir.display());
    let listing = ChecksumGenerator::new(algorithm).generate(dir, &mut progress)?;
    listing.write(output)?;

    println!("✅ Checksums generated and saved to {}.", output.display());
    println!("└─ Files: {}", listing.len());

    Ok(CommandStatus::Success)
}

/// Compare two checksum listings and write the comparison log
fn compare_command(previous: &Path, current: &Path, log_path: &Path) -> Result<CommandStatus> {
    let mut notes = Vec::new();
    let previous_listing = read_listing(previous, &mut notes)?;
    let current_listing = read_listing(current, &mut notes)?;

    let mut comparison = compare_listings(&previous_listing, &current_listing);
    notes.append(&mut comparison.notes);
    comparison.notes = notes;

    write_output_file(log_path, &format_comparison_log(&comparison))?;
    log::info!("Comparison log written to {}", log_path.display());

    PrettyPrinter::print_checksum_comparison(&comparison, log_path);

    Ok(if comparison.is_clean() {
        CommandStatus::Success
    } else {
        CommandStatus::DiscrepanciesFound
    })
}

/// Read a listing; a missing file counts as an empty listing and leaves a note
fn read_listing(path: &Path, notes: &mut Vec<String>) -> Result<ChecksumListing> {
    match ChecksumListing::read(path) {
        Ok(listing) => Ok(listing),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Checksums file not found: {}", path.display());
            notes.push(format!("Checksums file not found: {}", path.display()));
            Ok(ChecksumListing::new())
        }
        Err(e) => Err(TabreconError::checksum_listing(path, e.to_string())),
    }
}

/// Write a text file, creating parent directories if needed
fn write_output_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    Ok(())
}
