use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-column document written to `schema/columns/<column>.json`.
///
/// Collects the distinct values a column takes in every table that carries
/// it, plus pairwise value overlap between those tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ColumnCatalog {
    pub column_name: String,
    /// Distinct values per table, sorted.
    pub values_by_table: BTreeMap<String, BTreeSet<String>>,
    /// Pairwise overlap between tables sharing this column.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overlaps: Vec<ColumnOverlap>,
}

/// Value overlap between two tables for the same column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnOverlap {
    pub left_table: String,
    pub right_table: String,
    pub intersection: u64,
    pub union: u64,
    pub jaccard: f64,
}

impl ColumnCatalog {
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            values_by_table: BTreeMap::new(),
            overlaps: Vec::new(),
        }
    }

    /// Record the values observed for this column in one table.
    pub fn insert_table(&mut self, table: impl Into<String>, values: BTreeSet<String>) {
        self.values_by_table.insert(table.into(), values);
    }

    /// Recompute pairwise overlaps across all recorded tables.
    ///
    /// Pairs are emitted in lexicographic order so the serialized catalog is
    /// deterministic.
    pub fn compute_overlaps(&mut self) {
        self.overlaps.clear();
        let tables: Vec<&String> = self.values_by_table.keys().collect();

        for (left_idx, left) in tables.iter().enumerate() {
            for right in tables.iter().skip(left_idx + 1) {
                let left_values = &self.values_by_table[*left];
                let right_values = &self.values_by_table[*right];
                let intersection = left_values.intersection(right_values).count() as u64;
                let union = left_values.union(right_values).count() as u64;
                let jaccard = if union == 0 {
                    0.0
                } else {
                    intersection as f64 / union as f64
                };
                self.overlaps.push(ColumnOverlap {
                    left_table: (*left).clone(),
                    right_table: (*right).clone(),
                    intersection,
                    union,
                    jaccard,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn overlap_counts_intersection_and_union() {
        let mut catalog = ColumnCatalog::new("patient_id");
        catalog.insert_table("patients", values(&["a", "b", "c"]));
        catalog.insert_table("visits", values(&["b", "c", "d"]));
        catalog.compute_overlaps();

        assert_eq!(catalog.overlaps.len(), 1);
        let overlap = &catalog.overlaps[0];
        assert_eq!(overlap.left_table, "patients");
        assert_eq!(overlap.right_table, "visits");
        assert_eq!(overlap.intersection, 2);
        assert_eq!(overlap.union, 4);
        assert!((overlap.jaccard - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn overlap_pairs_are_lexicographic() {
        let mut catalog = ColumnCatalog::new("code");
        catalog.insert_table("c_table", values(&["x"]));
        catalog.insert_table("a_table", values(&["x"]));
        catalog.insert_table("b_table", values(&["y"]));
        catalog.compute_overlaps();

        let pairs: Vec<(String, String)> = catalog
            .overlaps
            .iter()
            .map(|overlap| (overlap.left_table.clone(), overlap.right_table.clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a_table".to_string(), "b_table".to_string()),
                ("a_table".to_string(), "c_table".to_string()),
                ("b_table".to_string(), "c_table".to_string()),
            ]
        );
    }
}
