//! Record-level reconciliation of a source dataset against a target dataset
//!
//! Records are aligned on a key field and every field of the source schema
//! is compared by exact string equality. The result lists discrepancies in
//! a fixed order:
//!
//! 1. keys only present in the target, in target row order
//! 2. keys only present in the source, in source row order
//! 3. field differences, by source column order, then by source row order
//!
//! Columns that exist only in the target are never compared: the source
//! defines the expected schema.

use crate::dataset::{Dataset, FieldValue, Key, Record, Side};
use crate::error::{Result, TabreconError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What to do when a key occurs more than once within one dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// Refuse to reconcile
    #[default]
    Reject,
    /// Keep the first occurrence and ignore later ones
    KeepFirst,
}

impl DuplicateKeyPolicy {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "keep_first" | "keep-first" => Ok(Self::KeepFirst),
            _ => Err(format!(
                "Invalid duplicate key policy: {}. Use 'reject' or 'keep_first'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub key_field: String,
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl ReconcileOptions {
    pub fn new(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            duplicate_keys: DuplicateKeyPolicy::default(),
        }
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// Key exists in the target only
    MissingInSource,
    /// Key exists in the source only
    MissingInTarget,
    /// Both values present and different
    ValueMismatch,
    /// Source value absent, target value present
    SourceValueMissing,
    /// Source value present, target value absent
    TargetValueMissing,
}

/// One reported difference for a single field and key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,
    pub field: String,
    pub key: Key,
    /// 1-based row number in the source file
    pub source_row: Option<usize>,
    /// 1-based row number in the target file
    pub target_row: Option<usize>,
    pub source_value: FieldValue,
    pub target_value: FieldValue,
}

impl Discrepancy {
    fn missing_key(field: &str, key: &Key, present_on: Side, record: &Record) -> Self {
        let row = Some(record.row_number());
        let value = FieldValue::present(key.as_str());
        match present_on {
            Side::Target => Self {
                kind: DiscrepancyKind::MissingInSource,
                field: field.to_string(),
                key: key.clone(),
                source_row: None,
                target_row: row,
                source_value: FieldValue::Absent,
                target_value: value,
            },
            Side::Source => Self {
                kind: DiscrepancyKind::MissingInTarget,
                field: field.to_string(),
                key: key.clone(),
                source_row: row,
                target_row: None,
                source_value: value,
                target_value: FieldValue::Absent,
            },
        }
    }

    /// Compare one field of an aligned pair; `None` when there is nothing to report
    fn compare_field(field: &str, key: &Key, source: &Record, target: &Record) -> Option<Self> {
        let s = source.get(field);
        let t = target.get(field);

        let (kind, source_row, target_row) = match (s, t) {
            (FieldValue::Present(a), FieldValue::Present(b)) if a != b => (
                DiscrepancyKind::ValueMismatch,
                Some(source.row_number()),
                Some(target.row_number()),
            ),
            (FieldValue::Absent, FieldValue::Present(_)) => {
                (DiscrepancyKind::SourceValueMissing, None, Some(target.row_number()))
            }
            (FieldValue::Present(_), FieldValue::Absent) => {
                (DiscrepancyKind::TargetValueMissing, Some(source.row_number()), None)
            }
            _ => return None,
        };

        Some(Self {
            kind,
            field: field.to_string(),
            key: key.clone(),
            source_row,
            target_row,
            source_value: s.clone(),
            target_value: t.clone(),
        })
    }

    /// True for the one-sided key presence kinds
    pub fn is_missing_key(&self) -> bool {
        matches!(
            self.kind,
            DiscrepancyKind::MissingInSource | DiscrepancyKind::MissingInTarget
        )
    }
}

/// Counters describing one reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub source_records: usize,
    pub target_records: usize,
    pub source_dropped_empty: usize,
    pub target_dropped_empty: usize,
    pub source_excluded_no_key: usize,
    pub target_excluded_no_key: usize,
    pub source_duplicates_ignored: usize,
    pub target_duplicates_ignored: usize,
    pub matched_keys: usize,
    pub only_in_source: usize,
    pub only_in_target: usize,
    pub fields_compared: usize,
}

/// Complete outcome of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub key_field: String,
    pub discrepancies: Vec<Discrepancy>,
    pub stats: ReconcileStats,
}

impl ValidationResult {
    pub fn passed(&self) -> bool {
        self.discrepancies.is_empty()
    }

    pub fn discrepancy_count(&self) -> usize {
        self.discrepancies.len()
    }
}

/// Reconcile `source` against `target` on `key_field` with default options
pub fn reconcile(source: &Dataset, target: &Dataset, key_field: &str) -> Result<ValidationResult> {
    Reconciler::new(ReconcileOptions::new(key_field)).reconcile(source, target)
}

/// Key-aligned comparison of two datasets
#[derive(Debug, Clone)]
pub struct Reconciler {
    options: ReconcileOptions,
}

/// Records of one dataset indexed by key, in first-seen order
struct KeyIndex<'a> {
    records: IndexMap<Key, &'a Record>,
    excluded_no_key: usize,
    duplicates_ignored: usize,
}

impl Reconciler {
    pub fn new(options: ReconcileOptions) -> Self {
        Self { options }
    }

    pub fn reconcile(&self, source: &Dataset, target: &Dataset) -> Result<ValidationResult> {
        let key_field = self.options.key_field.as_str();

        for (side, dataset) in [(Side::Source, source), (Side::Target, target)] {
            if !dataset.has_column(key_field) {
                return Err(TabreconError::missing_key_field(key_field, side));
            }
        }

        let source_index = self.index_by_key(source, Side::Source)?;
        let target_index = self.index_by_key(target, Side::Target)?;

        let mut stats = ReconcileStats {
            source_records: source.len(),
            target_records: target.len(),
            source_dropped_empty: source.dropped_empty_records(),
            target_dropped_empty: target.dropped_empty_records(),
            source_excluded_no_key: source_index.excluded_no_key,
            target_excluded_no_key: target_index.excluded_no_key,
            source_duplicates_ignored: source_index.duplicates_ignored,
            target_duplicates_ignored: target_index.duplicates_ignored,
            ..ReconcileStats::default()
        };

        let mut discrepancies = Vec::new();

        for (key, record) in &target_index.records {
            if !source_index.records.contains_key(key) {
                discrepancies.push(Discrepancy::missing_key(key_field, key, Side::Target, record));
                stats.only_in_target += 1;
            }
        }

        let mut aligned = Vec::new();
        for (key, record) in &source_index.records {
            match target_index.records.get(key) {
                Some(target_record) => aligned.push((key, *record, *target_record)),
                None => {
                    discrepancies.push(Discrepancy::missing_key(key_field, key, Side::Source, record));
                    stats.only_in_source += 1;
                }
            }
        }
        stats.matched_keys = aligned.len();

        for field in source.columns().iter().filter(|c| c.as_str() != key_field) {
            stats.fields_compared += 1;
            discrepancies.extend(aligned.iter().filter_map(|(key, source_record, target_record)| {
                Discrepancy::compare_field(field, key, source_record, target_record)
            }));
        }

        log::debug!(
            "Reconciled on '{}': {} matched, {} only in source, {} only in target, {} discrepancies",
            key_field,
            stats.matched_keys,
            stats.only_in_source,
            stats.only_in_target,
            discrepancies.len()
        );

        Ok(ValidationResult {
            key_field: key_field.to_string(),
            discrepancies,
            stats,
        })
    }

    fn index_by_key<'a>(&self, dataset: &'a Dataset, side: Side) -> Result<KeyIndex<'a>> {
        let key_field = self.options.key_field.as_str();
        let mut index = KeyIndex {
            records: IndexMap::with_capacity(dataset.len()),
            excluded_no_key: 0,
            duplicates_ignored: 0,
        };

        for record in dataset.records() {
            let Some(key) = Key::canonicalize(record.get(key_field)) else {
                log::debug!(
                    "Excluding {} row {}: no value for key field '{}'",
                    side,
                    record.row_number(),
                    key_field
                );
                index.excluded_no_key += 1;
                continue;
            };

            if let Some(first) = index.records.get(&key) {
                match self.options.duplicate_keys {
                    DuplicateKeyPolicy::Reject => {
                        return Err(TabreconError::DuplicateKey {
                            side,
                            key: key.to_string(),
                            first_row: first.row_number(),
                            duplicate_row: record.row_number(),
                        });
                    }
                    DuplicateKeyPolicy::KeepFirst => {
                        log::warn!(
                            "Ignoring duplicate key '{}' in {} row {} (first seen in row {})",
                            key,
                            side,
                            record.row_number(),
                            first.row_number()
                        );
                        index.duplicates_ignored += 1;
                        continue;
                    }
                }
            }

            index.records.insert(key, record);
        }

        Ok(index)
    }
}
