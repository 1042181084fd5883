//! Snapshot: the JSON shape a grid is exported to and imported from.
//!
//! ```json
//! {
//!   "Revenue": { "A": 1000, "B": 2000, "C": 3000 },
//!   "Costs":   { "A": 500,  "B": null, "C": 1200 }
//! }
//! ```
//!
//! Both levels are JSON objects whose key order carries meaning (row order and
//! column order), so entries are kept in insertion order rather than in a hash
//! or sorted map.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Largest magnitude below which every integral `f64` is exactly an `i64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Column letter to value mapping for one row of a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotRow {
    values: Vec<(String, Option<f64>)>,
}

impl SnapshotRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for a column letter, replacing an existing entry in place.
    pub fn insert(&mut self, column: impl Into<String>, value: Option<f64>) {
        let column = column.into();
        match self.values.iter_mut().find(|(key, _)| *key == column) {
            Some(entry) => entry.1 = value,
            None => self.values.push((column, value)),
        }
    }

    /// Value stored under `column`. Missing columns read as empty.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(key, _)| key == column)
            .and_then(|(_, value)| *value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.iter().any(|(key, _)| key == column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }
}

impl<K: Into<String>> FromIterator<(K, Option<f64>)> for SnapshotRow {
    fn from_iter<I: IntoIterator<Item = (K, Option<f64>)>>(iter: I) -> Self {
        let mut row = SnapshotRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

/// Whole-grid snapshot: row labels in row order, each with its column values.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    rows: Vec<(String, SnapshotRow)>,
    positions: HashMap<String, usize>,
    /// Next ` (n)` suffix to try per base label in [`Snapshot::insert_unique`].
    next_suffix: HashMap<String, usize>,
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row under `label`. An existing row with the same label is
    /// replaced but keeps its position.
    pub fn insert(&mut self, label: impl Into<String>, row: SnapshotRow) {
        let label = label.into();
        match self.positions.get(&label) {
            Some(&position) => self.rows[position].1 = row,
            None => self.push(label, row),
        }
    }

    /// Adds a row without replacing anything: a taken label gets a ` (n)`
    /// suffix, starting at 2. Returns the label actually used.
    pub fn insert_unique(&mut self, label: impl Into<String>, row: SnapshotRow) -> String {
        let label = label.into();
        let key = if self.contains_label(&label) {
            let mut n = self.next_suffix.get(&label).copied().unwrap_or(2);
            let candidate = loop {
                let candidate = format!("{} ({})", label, n);
                if !self.contains_label(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            self.next_suffix.insert(label, n + 1);
            candidate
        } else {
            label
        };

        self.push(key.clone(), row);
        key
    }

    fn push(&mut self, label: String, row: SnapshotRow) {
        self.positions.insert(label.clone(), self.rows.len());
        self.rows.push((label, row));
    }

    pub fn get(&self, label: &str) -> Option<&SnapshotRow> {
        self.positions.get(label).map(|&position| &self.rows[position].1)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SnapshotRow)> {
        self.rows.iter().map(|(key, row)| (key.as_str(), row))
    }
}

impl<K: Into<String>> FromIterator<(K, SnapshotRow)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, SnapshotRow)>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for (label, row) in iter {
            snapshot.insert(label, row);
        }
        snapshot
    }
}

/// Writes integral values as JSON integers so `1000` does not become `1000.0`.
struct CellNumber(Option<f64>);

impl Serialize for CellNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Some(v) if v.fract() == 0.0 && v.abs() < MAX_EXACT_INTEGER => {
                serializer.serialize_i64(v as i64)
            }
            Some(v) if v.is_finite() => serializer.serialize_f64(v),
            _ => serializer.serialize_none(),
        }
    }
}

impl Serialize for SnapshotRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in &self.values {
            map.serialize_entry(column, &CellNumber(*value))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SnapshotRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = SnapshotRow;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object mapping column letters to numbers or null")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut row = SnapshotRow::new();
                while let Some((column, value)) = map.next_entry::<String, Option<f64>>()? {
                    row.insert(column, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

impl Serialize for Snapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (label, row) in &self.rows {
            map.serialize_entry(label, row)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = Snapshot;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object mapping row labels to column objects")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut snapshot = Snapshot::new();
                while let Some((label, row)) = map.next_entry::<String, SnapshotRow>()? {
                    snapshot.insert(label, row);
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}
