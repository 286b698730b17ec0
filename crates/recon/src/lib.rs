//! `sheetdiff-recon`: keyed table comparison engine.
//!
//! Pure engine crate: receives two pre-loaded tables and a column mapping,
//! returns the keys missing on either side plus per-field differences for
//! keys present on both. No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod summary;

pub use config::{ColumnMapping, CompareOptions, CustomField, DuplicateKeyPolicy};
pub use engine::{compare, compare_with_options};
pub use error::{CompareError, DuplicateKey, MappingField, TableError};
pub use model::{CellValue, ComparisonResult, Difference, FieldChange, KeyedRecord, Side, Table};
pub use summary::ComparisonSummary;
