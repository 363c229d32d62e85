//! # tabrecon
//!
//! Record-level reconciliation of two tabular datasets. Records are aligned
//! on a unique identifier column, every field of the source schema is
//! compared as exact text, and the differences are rendered into a
//! deterministic plain-text report.
//!
//! The crate also generates checksum listings for directory trees and
//! compares two such listings.

pub mod cli;
pub mod error;
pub mod dataset;
pub mod loader;
pub mod engine;
pub mod report;
pub mod config;
pub mod checksum;
pub mod audit;
pub mod commands;
pub mod output;
pub mod progress;

pub use dataset::{Dataset, FieldValue, Key, Record, Side};
pub use engine::{reconcile, Discrepancy, DiscrepancyKind, Reconciler, ValidationResult};
pub use error::{Result, TabreconError};
pub use loader::DatasetLoader;
