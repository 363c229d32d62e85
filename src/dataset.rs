//! In-memory tabular data model: values, records, datasets and join keys

use crate::error::{Result, TabreconError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

static ABSENT: FieldValue = FieldValue::Absent;

/// A single cell value. `Absent` is never equal to any text, including the
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Present(String),
    Absent,
}

impl FieldValue {
    pub fn present(value: impl Into<String>) -> Self {
        Self::Present(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Present(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Present(value)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Absent, |v| Self::Present(v.to_string()))
    }
}

/// Which side of a reconciliation a dataset plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Canonical join key. Built by a straight string cast of the key field:
/// no trimming, no case folding, no numeric normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    /// Returns `None` for absent or empty values, which cannot be joined.
    pub fn canonicalize(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Present(text) if !text.is_empty() => Some(Self(text.clone())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of a dataset together with its position in the originating file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    index: usize,
    values: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new(index: usize, values: IndexMap<String, FieldValue>) -> Self {
        Self { index, values }
    }

    /// 0-based position in the source file, excluding the header
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based row number as shown in reports
    pub fn row_number(&self) -> usize {
        self.index + 1
    }

    /// Value of `field`, or `Absent` if this record does not carry it
    pub fn get(&self, field: &str) -> &FieldValue {
        self.values.get(field).unwrap_or(&ABSENT)
    }

    pub fn values(&self) -> &IndexMap<String, FieldValue> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(FieldValue::is_absent)
    }
}

/// An ordered, read-only collection of records sharing one column set
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
    next_index: usize,
    dropped_empty: usize,
}

impl Dataset {
    /// Create an empty dataset. Column names are made unique with
    /// [`disambiguate_columns`] so every cell keeps its own field.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: disambiguate_columns(&columns),
            ..Self::default()
        }
    }

    /// Build a dataset from positional rows. Each row is aligned with
    /// `columns`; missing trailing cells are treated as absent.
    pub fn from_rows<I, R, V>(columns: Vec<String>, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let mut dataset = Self::new(columns);
        for row in rows {
            dataset.push_row(row.into_iter().map(Into::into).collect())?;
        }
        Ok(dataset)
    }

    /// Append the next row of the originating file. The row always consumes
    /// an index, but rows whose every field is absent are not kept. A row
    /// with more cells than there are columns is rejected.
    pub fn push_row(&mut self, mut values: Vec<FieldValue>) -> Result<()> {
        let index = self.next_index;
        self.next_index += 1;

        if values.len() > self.columns.len() {
            return Err(TabreconError::RowTooLong {
                row: index + 1,
                expected: self.columns.len(),
                found: values.len(),
            });
        }

        values.resize(self.columns.len(), FieldValue::Absent);
        let record = Record::new(index, self.columns.iter().cloned().zip(values).collect());

        if record.is_empty() {
            log::debug!("Dropping empty record at row {}", record.row_number());
            self.dropped_empty += 1;
            return Ok(());
        }
        self.records.push(record);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows dropped because every field was absent
    pub fn dropped_empty_records(&self) -> usize {
        self.dropped_empty
    }
}

/// Give every column a unique, non-empty name.
///
/// Empty names become `Unnamed: <position>`; repeated names get a numeric
/// suffix in order of appearance (`a`, `a.1`, `a.2`).
pub fn disambiguate_columns(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(raw.len());

    for (position, name) in raw.iter().enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {}", position)
        } else {
            name.clone()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(candidate.clone());
        columns.push(candidate);
    }

    columns
}
