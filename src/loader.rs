//! Delimited-file loading into [`Dataset`]s

use crate::dataset::{Dataset, FieldValue};
use crate::error::{Result, TabreconError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b',';

/// Loads delimited text files with a header row.
///
/// Every cell is kept as text. Empty cells become [`FieldValue::Absent`],
/// blank lines are skipped without consuming a row index, and duplicate
/// header names are disambiguated with `.1`, `.2`, ... suffixes.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    delimiter: u8,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl DatasetLoader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Load a dataset from a file on disk
    pub fn load_file(&self, path: &Path) -> Result<Dataset> {
        if !path.is_file() {
            return Err(TabreconError::dataset_read(path, "file not found"));
        }

        let file = File::open(path).map_err(|e| TabreconError::dataset_read(path, e.to_string()))?;
        let dataset = self.load_reader(file, path)?;

        log::info!(
            "Loaded {} records ({} columns) from {}",
            dataset.len(),
            dataset.columns().len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Load a dataset from any reader; `origin` is only used in error messages
    pub fn load_reader<R: Read>(&self, reader: R, origin: &Path) -> Result<Dataset> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| TabreconError::dataset_read(origin, e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut dataset = Dataset::new(headers);
        for (i, row) in rdr.records().enumerate() {
            let row = row.map_err(|e| {
                TabreconError::dataset_read(origin, format!("record #{}: {}", i + 1, e))
            })?;

            let values = row
                .iter()
                .map(|cell| {
                    if cell.is_empty() {
                        FieldValue::Absent
                    } else {
                        FieldValue::present(cell)
                    }
                })
                .collect();
            dataset
                .push_row(values)
                .map_err(|e| TabreconError::dataset_read(origin, e.to_string()))?;
        }

        if dataset.dropped_empty_records() > 0 {
            log::debug!(
                "Dropped {} empty records from {}",
                dataset.dropped_empty_records(),
                origin.display()
            );
        }

        Ok(dataset)
    }
}
