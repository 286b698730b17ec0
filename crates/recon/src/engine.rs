use tracing::debug;

use crate::config::{ColumnMapping, CompareOptions, DuplicateKeyPolicy};
use crate::error::{CompareError, MappingField};
use crate::matcher::{partition_keys, KeyIndex};
use crate::model::{CellValue, ComparisonResult, Difference, FieldChange, KeyedRecord, Side, Table};

/// A comparison field resolved for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveField {
    pub name: String,
    pub index: usize,
}

/// Compare two tables by key using first-occurrence lookup for duplicate keys.
pub fn compare(
    table_a: &Table,
    table_b: &Table,
    mapping: &ColumnMapping,
    include_detailed_fields: bool,
) -> Result<ComparisonResult, CompareError> {
    compare_with_options(
        table_a,
        table_b,
        mapping,
        &CompareOptions::detailed(include_detailed_fields),
    )
}

/// Compare two tables by key. Returns keys missing on either side and the
/// field-level differences of keys present in both.
pub fn compare_with_options(
    table_a: &Table,
    table_b: &Table,
    mapping: &ColumnMapping,
    options: &CompareOptions,
) -> Result<ComparisonResult, CompareError> {
    validate_mapping(table_a, table_b, mapping, options.include_detailed_fields)?;

    let index_a = KeyIndex::build(table_a, mapping.key_index);
    let index_b = KeyIndex::build(table_b, mapping.key_index);

    if options.duplicate_keys == DuplicateKeyPolicy::Reject {
        let mut duplicates = index_a.duplicates(Side::A);
        duplicates.extend(index_b.duplicates(Side::B));
        if !duplicates.is_empty() {
            return Err(CompareError::DuplicateKeys(duplicates));
        }
    }

    let partition = partition_keys(&index_a, &index_b);

    let mut result = ComparisonResult {
        count_a: table_a.len(),
        count_b: table_b.len(),
        only_in_a: keyed_records(&index_a, &partition.only_a, mapping.description_index),
        only_in_b: keyed_records(&index_b, &partition.only_b, mapping.description_index),
        differences: Vec::new(),
    };

    if !options.include_detailed_fields && !mapping.has_custom_fields() {
        debug!("no comparison fields configured; skipping field comparison");
        return Ok(result);
    }

    let fields = active_fields(table_a, table_b, mapping, options.include_detailed_fields);
    if fields.is_empty() {
        return Ok(result);
    }

    for key in partition.common {
        let (Some(record_a), Some(record_b)) =
            (index_a.first_record(key), index_b.first_record(key))
        else {
            continue;
        };
        let description = mapping.description_index;
        if let Some(diff) = diff_records(key, record_a, record_b, &fields, description) {
            result.differences.push(diff);
        }
    }

    debug!(
        only_in_a = result.only_in_a.len(),
        only_in_b = result.only_in_b.len(),
        differences = result.differences.len(),
        "comparison finished"
    );

    Ok(result)
}

/// Required indices must exist in both tables.
fn validate_mapping(
    table_a: &Table,
    table_b: &Table,
    mapping: &ColumnMapping,
    include_detailed_fields: bool,
) -> Result<(), CompareError> {
    let mut required = vec![
        (MappingField::Key, mapping.key_index),
        (MappingField::Description, mapping.description_index),
    ];
    if include_detailed_fields {
        required.extend(mapping.detailed_fields().iter().map(|(_, field, index)| (*field, *index)));
    }

    for table in [table_a, table_b] {
        for &(field, index) in &required {
            if index >= table.column_count() {
                return Err(CompareError::Configuration {
                    field,
                    index,
                    columns: table.column_count(),
                    table: table.name().to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Build the ordered field list for one run: the detailed triad first (when
/// enabled), then custom fields in mapping order. Custom fields whose index
/// is out of range for either table are skipped.
pub fn active_fields(
    table_a: &Table,
    table_b: &Table,
    mapping: &ColumnMapping,
    include_detailed_fields: bool,
) -> Vec<ActiveField> {
    let mut fields = Vec::new();

    if include_detailed_fields {
        for (name, _, index) in mapping.detailed_fields() {
            fields.push(ActiveField {
                name: name.to_string(),
                index,
            });
        }
    }

    for custom in &mapping.custom_fields {
        if custom.index >= table_a.column_count() || custom.index >= table_b.column_count() {
            debug!(
                field = %custom.name,
                index = custom.index,
                columns_a = table_a.column_count(),
                columns_b = table_b.column_count(),
                "skipping custom field with out-of-range index"
            );
            continue;
        }
        fields.push(ActiveField {
            name: custom.name.clone(),
            index: custom.index,
        });
    }

    fields
}

fn keyed_records(
    index: &KeyIndex<'_>,
    keys: &[&CellValue],
    description_index: usize,
) -> Vec<KeyedRecord> {
    keys.iter()
        .map(|key| KeyedRecord {
            key: (*key).clone(),
            description: index
                .first_record(key)
                .map(|record| record[description_index].clone())
                .unwrap_or_default(),
        })
        .collect()
}

fn diff_records(
    key: &CellValue,
    record_a: &[CellValue],
    record_b: &[CellValue],
    fields: &[ActiveField],
    description_index: usize,
) -> Option<Difference> {
    let mut diff = Difference {
        key: key.clone(),
        description: record_a[description_index].clone(),
        fields: Vec::new(),
    };

    for field in fields {
        let value_a = &record_a[field.index];
        let value_b = &record_b[field.index];
        if value_a != value_b {
            diff.record(FieldChange {
                field: field.name.clone(),
                value_a: value_a.clone(),
                value_b: value_b.clone(),
            });
        }
    }

    (!diff.fields.is_empty()).then_some(diff)
}
