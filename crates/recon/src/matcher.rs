use std::collections::BTreeMap;

use crate::error::DuplicateKey;
use crate::model::{CellValue, Side, Table};

/// Key set of one table: each distinct key with the position of its first
/// record and its occurrence count. Iteration is in ascending key order.
#[derive(Debug)]
pub struct KeyIndex<'t> {
    table: &'t Table,
    entries: BTreeMap<&'t CellValue, (usize, usize)>,
}

impl<'t> KeyIndex<'t> {
    /// Index `table` by the value at `key_index`. The caller has already
    /// checked that `key_index` is in range.
    pub fn build(table: &'t Table, key_index: usize) -> Self {
        let mut entries: BTreeMap<&'t CellValue, (usize, usize)> = BTreeMap::new();
        for (pos, record) in table.records().iter().enumerate() {
            let entry = entries.entry(&record[key_index]).or_insert((pos, 0));
            entry.1 += 1;
        }
        Self { table, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &CellValue) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'t CellValue> + '_ {
        self.entries.keys().copied()
    }

    /// First record carrying `key`.
    pub fn first_record(&self, key: &CellValue) -> Option<&'t [CellValue]> {
        let (pos, _) = self.entries.get(key)?;
        self.table.records().get(*pos).map(Vec::as_slice)
    }

    pub fn duplicates(&self, side: Side) -> Vec<DuplicateKey> {
        self.entries
            .iter()
            .filter(|(_, (_, count))| *count > 1)
            .map(|(key, (_, count))| DuplicateKey {
                side,
                key: (*key).clone(),
                count: *count,
            })
            .collect()
    }
}

/// Keys split into A-only, B-only and common, each in ascending order.
#[derive(Debug, Default)]
pub struct KeyPartition<'t> {
    pub only_a: Vec<&'t CellValue>,
    pub only_b: Vec<&'t CellValue>,
    pub common: Vec<&'t CellValue>,
}

/// Set reconciliation of two key indexes.
pub fn partition_keys<'t>(a: &KeyIndex<'t>, b: &KeyIndex<'t>) -> KeyPartition<'t> {
    let mut out = KeyPartition::default();

    for key in a.keys() {
        if b.contains(key) {
            out.common.push(key);
        } else {
            out.only_a.push(key);
        }
    }

    for key in b.keys() {
        if !a.contains(key) {
            out.only_b.push(key);
        }
    }

    out
}
