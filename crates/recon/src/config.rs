use serde::{Deserialize, Serialize};

use crate::error::MappingField;

/// Default column positions, matching the usual stock-report export layout.
pub const DEFAULT_KEY_INDEX: usize = 1;
pub const DEFAULT_DESCRIPTION_INDEX: usize = 5;
pub const DEFAULT_INCOMING_INDEX: usize = 6;
pub const DEFAULT_OUTGOING_INDEX: usize = 7;
pub const DEFAULT_REMAINING_INDEX: usize = 8;

/// Field names of the detailed comparison triad, in comparison order.
pub const INCOMING: &str = "Incoming";
pub const OUTGOING: &str = "Outgoing";
pub const REMAINING: &str = "Remaining";

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Zero-based column positions used by a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub key_index: usize,
    pub description_index: usize,
    pub incoming_index: usize,
    pub outgoing_index: usize,
    pub remaining_index: usize,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

/// A user-named comparison field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub name: String,
    pub index: usize,
}

impl CustomField {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            key_index: DEFAULT_KEY_INDEX,
            description_index: DEFAULT_DESCRIPTION_INDEX,
            incoming_index: DEFAULT_INCOMING_INDEX,
            outgoing_index: DEFAULT_OUTGOING_INDEX,
            remaining_index: DEFAULT_REMAINING_INDEX,
            custom_fields: Vec::new(),
        }
    }
}

impl ColumnMapping {
    /// Mapping with the given key and description columns and default triad positions.
    pub fn new(key_index: usize, description_index: usize) -> Self {
        Self {
            key_index,
            description_index,
            ..Self::default()
        }
    }

    pub fn with_detailed(mut self, incoming: usize, outgoing: usize, remaining: usize) -> Self {
        self.incoming_index = incoming;
        self.outgoing_index = outgoing;
        self.remaining_index = remaining;
        self
    }

    pub fn with_custom(mut self, name: impl Into<String>, index: usize) -> Self {
        self.custom_fields.push(CustomField::new(name, index));
        self
    }

    pub fn has_custom_fields(&self) -> bool {
        !self.custom_fields.is_empty()
    }

    /// The detailed triad as (display name, mapping field, index).
    pub fn detailed_fields(&self) -> [(&'static str, MappingField, usize); 3] {
        [
            (INCOMING, MappingField::Incoming, self.incoming_index),
            (OUTGOING, MappingField::Outgoing, self.outgoing_index),
            (REMAINING, MappingField::Remaining, self.remaining_index),
        ]
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do when a key occurs more than once within one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// The first record carrying the key is used; later ones are ignored.
    #[default]
    FirstWins,
    /// Fail with `CompareError::DuplicateKeys`.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompareOptions {
    /// Compare the Incoming/Outgoing/Remaining triad.
    pub include_detailed_fields: bool,
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl CompareOptions {
    pub fn detailed(include_detailed_fields: bool) -> Self {
        Self {
            include_detailed_fields,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mapping_positions() {
        let m = ColumnMapping::default();
        assert_eq!(m.key_index, 1);
        assert_eq!(m.description_index, 5);
        assert_eq!(
            m.detailed_fields().map(|(_, _, i)| i),
            [6, 7, 8]
        );
        assert!(!m.has_custom_fields());
    }

    #[test]
    fn triad_order_is_fixed() {
        let m = ColumnMapping::new(0, 1).with_detailed(2, 3, 4);
        let names: Vec<&str> = m.detailed_fields().iter().map(|(n, _, _)| *n).collect();
        assert_eq!(names, vec!["Incoming", "Outgoing", "Remaining"]);
    }

    #[test]
    fn custom_fields_keep_insertion_order() {
        let m = ColumnMapping::new(0, 1)
            .with_custom("Region", 9)
            .with_custom("Price", 3);
        assert_eq!(m.custom_fields[0], CustomField::new("Region", 9));
        assert_eq!(m.custom_fields[1].name, "Price");
    }

    #[test]
    fn mapping_deserializes_without_custom_fields() {
        let json = r#"{"key_index":0,"description_index":1,"incoming_index":2,"outgoing_index":3,"remaining_index":4}"#;
        let m: ColumnMapping = serde_json::from_str(json).unwrap();
        assert!(m.custom_fields.is_empty());
        assert_eq!(m.remaining_index, 4);
    }

    #[test]
    fn duplicate_policy_defaults_to_first_wins() {
        assert_eq!(CompareOptions::default().duplicate_keys, DuplicateKeyPolicy::FirstWins);
        assert!(CompareOptions::detailed(true).include_detailed_fields);
    }
}
