use std::fmt;

use crate::model::{CellValue, Side};

/// Mapping entries that must resolve to a column on both tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingField {
    Key,
    Description,
    Incoming,
    Outgoing,
    Remaining,
}

impl MappingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Description => "description",
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
            Self::Remaining => "remaining",
        }
    }
}

impl fmt::Display for MappingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateKey {
    pub side: Side,
    pub key: CellValue,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompareError {
    /// A required mapping index does not exist in one of the tables.
    Configuration {
        field: MappingField,
        index: usize,
        columns: usize,
        table: String,
    },
    /// Keys occurring more than once (only under `DuplicateKeyPolicy::Reject`).
    DuplicateKeys(Vec<DuplicateKey>),
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { field, index, columns, table } => write!(
                f,
                "configuration error: {field} column index {index} is out of range for '{table}' ({columns} columns)"
            ),
            Self::DuplicateKeys(dups) => {
                writeln!(f, "duplicate keys found:")?;
                for dup in dups {
                    writeln!(
                        f,
                        "  table {} key {:?} appears {} times",
                        dup.side.as_str(),
                        dup.key.to_string(),
                        dup.count
                    )?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CompareError {}

/// Table construction error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A record has more values than the header has columns.
    RecordTooWide { row: usize, width: usize, columns: usize },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecordTooWide { row, width, columns } => write!(
                f,
                "record {row} has {width} values but the header has {columns} columns"
            ),
        }
    }
}

impl std::error::Error for TableError {}
