//! Per-run validation settings
//!
//! Settings come from an optional JSON file and from command-line flags;
//! flags win. Nothing is read from process-wide defaults except the report
//! file name.

use crate::engine::{DuplicateKeyPolicy, ReconcileOptions};
use crate::error::{Result, TabreconError};
use crate::loader::DEFAULT_DELIMITER;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Report file written when no path is configured
pub const DEFAULT_REPORT_FILE: &str = "validation_report.txt";

/// Validation settings as they appear in a config file. Every field is optional
/// so a file can hold only the parts shared between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    #[serde(default)]
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub target: Option<PathBuf>,
    #[serde(default)]
    pub report: Option<PathBuf>,
    #[serde(default)]
    pub key_field: Option<String>,
    #[serde(default)]
    pub delimiter: Option<char>,
    #[serde(default)]
    pub duplicate_keys: Option<DuplicateKeyPolicy>,
}

impl ValidationConfig {
    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TabreconError::config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        let config = serde_json::from_str(&content).map_err(|e| {
            TabreconError::config(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win
    pub fn merge(self, overrides: ValidationConfig) -> Self {
        Self {
            source: overrides.source.or(self.source),
            target: overrides.target.or(self.target),
            report: overrides.report.or(self.report),
            key_field: overrides.key_field.or(self.key_field),
            delimiter: overrides.delimiter.or(self.delimiter),
            duplicate_keys: overrides.duplicate_keys.or(self.duplicate_keys),
        }
    }

    /// Check required settings and fill defaults
    pub fn resolve(self) -> Result<ValidationSettings> {
        let source = self
            .source
            .ok_or_else(|| TabreconError::config("No source file given (use --source)"))?;
        let target = self
            .target
            .ok_or_else(|| TabreconError::config("No target file given (use --target)"))?;
        let key_field = self
            .key_field
            .filter(|k| !k.is_empty())
            .ok_or_else(|| TabreconError::config("No unique identifier field given (use --key)"))?;

        let delimiter = match self.delimiter {
            None => DEFAULT_DELIMITER,
            Some(c) if c.is_ascii() && c != '\n' && c != '\r' && c != '"' => c as u8,
            Some(c) => {
                return Err(TabreconError::config(format!(
                    "Invalid delimiter {:?}: must be a single ASCII character other than a quote or newline",
                    c
                )))
            }
        };

        Ok(ValidationSettings {
            source,
            target,
            report: self.report.unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE)),
            key_field,
            delimiter,
            duplicate_keys: self.duplicate_keys.unwrap_or_default(),
        })
    }
}

/// Fully resolved settings for one validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSettings {
    pub source: PathBuf,
    pub target: PathBuf,
    pub report: PathBuf,
    pub key_field: String,
    pub delimiter: u8,
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl ValidationSettings {
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions::new(self.key_field.clone()).with_duplicate_keys(self.duplicate_keys)
    }
}

/// Parse a delimiter flag value into a single character
pub fn parse_delimiter(s: &str) -> std::result::Result<char, String> {
    match s {
        "\\t" | "tab" => Ok('\t'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("Invalid delimiter: '{}'. Must be a single character.", s)),
            }
        }
    }
}
