use std::fmt;

use ordered_float::OrderedFloat;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::TableError;

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A single cell value.
///
/// Equality is type-aware: numbers compare numerically, text compares by
/// exact content, and a number never equals text (`5` vs `"5"`). The derived
/// order (`Empty < Number < Text`) is what makes key iteration deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellValue {
    #[default]
    Empty,
    Number(OrderedFloat<f64>),
    Text(String),
}

impl CellValue {
    pub fn number(n: f64) -> Self {
        Self::Number(OrderedFloat(n))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n.into_inner()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(n) => {
                let n = n.into_inner();
                // Integers without decimals
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_none(),
            Self::Number(n) => serializer.serialize_f64(n.into_inner()),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        Self::number(f64::from(n))
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Which of the two compared tables a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::A => "a",
            Side::B => "b",
        }
    }
}

/// A parsed table: header labels plus fixed-arity records.
///
/// Every record has exactly `column_count()` values; short records are
/// padded with `CellValue::Empty` on insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    name: String,
    header: Vec<String>,
    records: Vec<Vec<CellValue>>,
}

impl Table {
    /// Empty table with the given identity and header.
    pub fn new(name: impl Into<String>, header: Vec<String>) -> Self {
        Self {
            name: name.into(),
            header,
            records: Vec::new(),
        }
    }

    pub fn from_records(
        name: impl Into<String>,
        header: Vec<String>,
        records: Vec<Vec<CellValue>>,
    ) -> Result<Self, TableError> {
        let mut table = Self::new(name, header);
        table.records.reserve(records.len());
        for record in records {
            table.push_record(record)?;
        }
        Ok(table)
    }

    pub fn push_record(&mut self, mut record: Vec<CellValue>) -> Result<(), TableError> {
        let columns = self.header.len();
        if record.len() > columns {
            return Err(TableError::RecordTooWide {
                row: self.records.len(),
                width: record.len(),
                columns,
            });
        }
        record.resize(columns, CellValue::Empty);
        self.records.push(record);
        Ok(())
    }

    /// Identity used in error messages ("File 1", a path, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.header.get(index).map(String::as_str)
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn records(&self) -> &[Vec<CellValue>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A key with the description of its first record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyedRecord {
    pub key: CellValue,
    pub description: CellValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub value_a: CellValue,
    pub value_b: CellValue,
}

/// A key present in both tables whose compared fields disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    pub key: CellValue,
    pub description: CellValue,
    /// Serialized as `{"<field>": [value_a, value_b], ...}` in field order.
    #[serde(serialize_with = "serialize_field_map")]
    pub fields: Vec<FieldChange>,
}

impl Difference {
    pub fn field(&self, name: &str) -> Option<&FieldChange> {
        self.fields.iter().find(|c| c.field == name)
    }

    /// Record a change; a repeated field name replaces the earlier entry in place.
    pub(crate) fn record(&mut self, change: FieldChange) {
        match self.fields.iter_mut().find(|c| c.field == change.field) {
            Some(existing) => *existing = change,
            None => self.fields.push(change),
        }
    }
}

fn serialize_field_map<S: Serializer>(
    fields: &[FieldChange],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for change in fields {
        map.serialize_entry(&change.field, &(&change.value_a, &change.value_b))?;
    }
    map.end()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub count_a: usize,
    pub count_b: usize,
    pub only_in_a: Vec<KeyedRecord>,
    pub only_in_b: Vec<KeyedRecord>,
    pub differences: Vec<Difference>,
}

impl ComparisonResult {
    /// True when no key is missing on either side and no field disagrees.
    pub fn is_identical(&self) -> bool {
        self.only_in_a.is_empty() && self.only_in_b.is_empty() && self.differences.is_empty()
    }
}
