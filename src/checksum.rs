//! File checksums over a directory tree and the flat listing format
//!
//! A listing is a text file with one `<path>: <digest>` line per file.

use crate::error::Result;
use crate::progress::ProgressReporter;
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read size used when hashing files
const CHUNK_SIZE: usize = 64 * 1024;

/// Separator between path and digest in a listing line
const SEPARATOR: &str = ": ";

/// Supported hashing algorithms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    #[default]
    Sha256,
    Blake3,
}

impl ChecksumAlgorithm {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),
            _ => Err(format!("Invalid checksum algorithm: {}. Use 'sha256' or 'blake3'", s)),
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => f.write_str("sha256"),
            Self::Blake3 => f.write_str("blake3"),
        }
    }
}

/// Hash a file's contents and return the lowercase hex digest
pub fn checksum_file(path: &Path, algorithm: ChecksumAlgorithm) -> anyhow::Result<String> {
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut buffer = vec![0u8; CHUNK_SIZE];

    match algorithm {
        ChecksumAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            loop {
                let n = file
                    .read(&mut buffer)
                    .with_context(|| format!("read {}", path.display()))?;
                if n == 0 {
                    break;
                }
                hasher.update(&buffer[..n]);
            }
            Ok(format!("{:x}", hasher.finalize()))
        }
        ChecksumAlgorithm::Blake3 => {
            let mut hasher = blake3::Hasher::new();
            loop {
                let n = file
                    .read(&mut buffer)
                    .with_context(|| format!("read {}", path.display()))?;
                if n == 0 {
                    break;
                }
                hasher.update(&buffer[..n]);
            }
            Ok(hasher.finalize().to_hex().to_string())
        }
    }
}

/// A digest and the 1-based listing line it appears on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumEntry {
    pub digest: String,
    pub line: usize,
}

/// A listing line that is not of the form `<path>: <digest>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidLine {
    pub line: usize,
    pub content: String,
}

/// Ordered path → digest listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumListing {
    entries: IndexMap<String, ChecksumEntry>,
    invalid_lines: Vec<InvalidLine>,
}

impl ChecksumListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry on the next listing line
    pub fn push(&mut self, path: impl Into<String>, digest: impl Into<String>) {
        let line = self.entries.len() + 1;
        self.entries.insert(
            path.into(),
            ChecksumEntry {
                digest: digest.into(),
                line,
            },
        );
    }

    /// Parse listing text. Malformed lines are collected, not fatal; a path
    /// listed twice keeps its first position and its last digest.
    pub fn parse(text: &str) -> Self {
        let mut listing = Self::new();

        for (i, raw) in text.lines().enumerate() {
            let line_number = i + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let parts: Vec<&str> = line.split(SEPARATOR).collect();
            match parts.as_slice() {
                [path, digest] => {
                    let entry = ChecksumEntry {
                        digest: digest.to_string(),
                        line: line_number,
                    };
                    listing.entries.insert(path.to_string(), entry);
                }
                _ => {
                    log::warn!("Invalid format in line {}: {}", line_number, line);
                    listing.invalid_lines.push(InvalidLine {
                        line: line_number,
                        content: line.to_string(),
                    });
                }
            }
        }

        listing
    }

    /// Read and parse a listing file
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Render in listing format
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|(path, entry)| format!("{}{}{}\n", path, SEPARATOR, entry.digest))
            .collect()
    }

    /// Write the listing, creating parent directories as needed
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_text())?;
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&ChecksumEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &ChecksumEntry)> {
        self.entries.iter().map(|(path, entry)| (path.as_str(), entry))
    }

    pub fn invalid_lines(&self) -> &[InvalidLine] {
        &self.invalid_lines
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hashes every file below a root directory
#[derive(Debug, Clone, Default)]
pub struct ChecksumGenerator {
    algorithm: ChecksumAlgorithm,
}

impl ChecksumGenerator {
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Walk `root` in file-name order and hash each regular file.
    ///
    /// Files that cannot be read are logged and left out of the listing.
    pub fn generate(&self, root: &Path, progress: &mut ProgressReporter) -> Result<ChecksumListing> {
        if !root.is_dir() {
            return Err(crate::error::TabreconError::invalid_input(format!(
                "Not a directory: {}",
                root.display()
            )));
        }

        let files = collect_files(root);
        progress.start_files(files.len() as u64);

        let mut listing = ChecksumListing::new();
        let mut skipped = 0usize;
        for (i, path) in files.iter().enumerate() {
            match checksum_file(path, self.algorithm) {
                Ok(digest) => listing.push(path.to_string_lossy(), digest),
                Err(e) => {
                    log::warn!("Error calculating checksum for {}: {:#}", path.display(), e);
                    skipped += 1;
                }
            }
            progress.update_files(i as u64 + 1);
        }

        progress.finish_files(&format!("Hashed {} files", listing.len()));
        log::info!(
            "Generated {} {} checksums under {} ({} skipped)",
            listing.len(),
            self.algorithm,
            root.display(),
            skipped
        );
        Ok(listing)
    }
}

fn collect_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => log::warn!("Skipping unreadable entry: {}", e),
        }
    }
    files
}
