//! Command-line interface for tabrecon

use crate::config::parse_delimiter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tabrecon")]
#[command(about = "Reconcile tabular datasets record by record and audit file checksums")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a target dataset against a source dataset on a unique identifier
    Validate {
        /// Source (reference) file
        #[arg(long)]
        source: Option<PathBuf>,

        /// Target file checked against the source
        #[arg(long)]
        target: Option<PathBuf>,

        /// Unique identifier column used to align records
        #[arg(long = "key")]
        key_field: Option<String>,

        /// Report file (default: validation_report.txt)
        #[arg(long)]
        report: Option<PathBuf>,

        /// JSON file with validation settings; flags override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Field delimiter (single character, or "\t")
        #[arg(long, value_parser = parse_delimiter)]
        delimiter: Option<char>,

        /// Keep the first record for a repeated identifier instead of failing
        #[arg(long)]
        allow_duplicate_keys: bool,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// Generate checksums for every file under a directory
    Checksum {
        /// Directory to scan
        dir: PathBuf,

        /// Listing file to write
        #[arg(long, default_value = "checksums.txt")]
        output: PathBuf,

        /// Hash algorithm: "sha256" or "blake3"
        #[arg(long, default_value = "sha256")]
        algorithm: String,
    },

    /// Compare a previous checksum listing against a current one
    Compare {
        /// Earlier listing
        previous: PathBuf,

        /// Later listing
        current: PathBuf,

        /// Comparison log file
        #[arg(long, default_value = "checksum_comparison_log.txt")]
        log: PathBuf,
    },
}

/// Parse output format string
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}
