use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::json;
use thiserror::Error;

use datamend_core::{ColumnCatalog, TableSchema};

/// Errors for schema queries.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("schema directory not found: {0}")]
    MissingSchema(String),
    #[error("table '{0}' not found")]
    UnknownTable(String),
    #[error("column '{0}' not found")]
    UnknownColumn(String),
    #[error("usage: {0}")]
    Usage(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read surface over the built schema documents.
pub struct SchemaQuery {
    tables: BTreeMap<String, TableSchema>,
    columns: BTreeMap<String, ColumnCatalog>,
}

impl SchemaQuery {
    /// Load every schema document under `schema/tables` and `schema/columns`.
    pub fn load(schema_dir: &Path) -> Result<Self, QueryError> {
        let tables_dir = schema_dir.join("tables");
        if !tables_dir.is_dir() {
            return Err(QueryError::MissingSchema(tables_dir.display().to_string()));
        }

        let mut tables = BTreeMap::new();
        for entry in fs::read_dir(&tables_dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            let schema: TableSchema = serde_json::from_str(&fs::read_to_string(&path)?)?;
            tables.insert(schema.table_name.clone(), schema);
        }

        let mut columns = BTreeMap::new();
        let columns_dir = schema_dir.join("columns");
        if columns_dir.is_dir() {
            for entry in fs::read_dir(&columns_dir)? {
                let path = entry?.path();
                if !path.extension().is_some_and(|ext| ext == "json") {
                    continue;
                }
                let catalog: ColumnCatalog = serde_json::from_str(&fs::read_to_string(&path)?)?;
                columns.insert(catalog.column_name.clone(), catalog);
            }
        }

        Ok(Self { tables, columns })
    }

    /// List all tables alphabetically with record counts.
    pub fn tables(&self) -> serde_json::Value {
        let tables: Vec<serde_json::Value> = self
            .tables
            .values()
            .map(|schema| {
                json!({
                    "name": schema.table_name,
                    "record_count": schema.record_count,
                })
            })
            .collect();
        json!({
            "total_tables": tables.len(),
            "tables": tables,
        })
    }

    /// List all columns of a table with their headline statistics.
    pub fn columns(&self, table: &str) -> Result<serde_json::Value, QueryError> {
        let schema = self.find_table(table)?;

        let mut columns: Vec<serde_json::Value> = schema
            .columns
            .iter()
            .map(|(name, profile)| {
                json!({
                    "name": name,
                    "non_empty_percentage": profile.non_empty_percentage,
                    "unique_values": profile.unique_values,
                    "total_values": profile.total_values,
                })
            })
            .collect();
        columns.sort_by(|a, b| {
            let left = a["non_empty_percentage"].as_f64().unwrap_or(0.0);
            let right = b["non_empty_percentage"].as_f64().unwrap_or(0.0);
            right
                .partial_cmp(&left)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a["name"].as_str().cmp(&b["name"].as_str()))
        });

        Ok(json!({
            "table": schema.table_name,
            "record_count": schema.record_count,
            "columns": columns,
        }))
    }

    /// Dump the distinct values of `table.column` from the column catalog.
    pub fn values(&self, target: &str) -> Result<serde_json::Value, QueryError> {
        let (table, column) = target
            .split_once('.')
            .ok_or_else(|| QueryError::Usage("values <table.column>".to_string()))?;

        let schema = self.find_table(table)?;
        let catalog = self.find_column(column)?;
        let values = catalog
            .values_by_table
            .get(&schema.table_name)
            .ok_or_else(|| QueryError::UnknownColumn(format!("{table}.{column}")))?;

        Ok(json!({
            "table": schema.table_name,
            "column": catalog.column_name,
            "values": values.iter().collect::<Vec<_>>(),
        }))
    }

    /// Find every table/column that contains a value.
    pub fn where_value(&self, value: &str) -> serde_json::Value {
        let mut occurrences = Vec::new();
        for catalog in self.columns.values() {
            for (table, values) in &catalog.values_by_table {
                if values.contains(value) {
                    occurrences.push(json!({
                        "table": table,
                        "column": catalog.column_name,
                    }));
                }
            }
        }
        occurrences.sort_by(|a, b| {
            (a["table"].as_str(), a["column"].as_str()).cmp(&(b["table"].as_str(), b["column"].as_str()))
        });

        json!({
            "search_value": value,
            "occurrences": occurrences,
        })
    }

    fn find_table(&self, table: &str) -> Result<&TableSchema, QueryError> {
        self.tables
            .values()
            .find(|schema| schema.table_name.eq_ignore_ascii_case(table))
            .ok_or_else(|| QueryError::UnknownTable(table.to_string()))
    }

    fn find_column(&self, column: &str) -> Result<&ColumnCatalog, QueryError> {
        self.columns
            .values()
            .find(|catalog| catalog.column_name.eq_ignore_ascii_case(column))
            .ok_or_else(|| QueryError::UnknownColumn(column.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use datamend_core::{Table, write_table};
    use datamend_profile::{ProfileOptions, SchemaBuilder};

    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("datamend_query_{label}_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn build_fixture_schema() -> PathBuf {
        let dataset = temp_dir("dataset");
        let patients = Table {
            name: "patients".to_string(),
            headers: vec!["patients_id".to_string(), "name".to_string()],
            rows: vec![
                vec!["1".to_string(), "Alice".to_string()],
                vec!["2".to_string(), "Bob".to_string()],
            ],
        };
        write_table(&dataset.join("patients.csv"), &patients).expect("write patients");
        let visits = Table {
            name: "visits".to_string(),
            headers: vec!["visits_id".to_string(), "patients_id".to_string()],
            rows: vec![vec!["v1".to_string(), "1".to_string()]],
        };
        write_table(&dataset.join("visits.csv"), &visits).expect("write visits");

        let schema_dir = temp_dir("schema");
        let options = ProfileOptions {
            schema_dir: schema_dir.clone(),
            ..ProfileOptions::default()
        };
        SchemaBuilder::new(options)
            .run(&dataset)
            .expect("profile dataset");
        schema_dir
    }

    #[test]
    fn tables_lists_alphabetically() {
        let schema = SchemaQuery::load(&build_fixture_schema()).expect("load schema");
        let result = schema.tables();
        assert_eq!(result["total_tables"], 2);
        assert_eq!(result["tables"][0]["name"], "patients");
        assert_eq!(result["tables"][1]["name"], "visits");
    }

    #[test]
    fn lookups_are_case_insensitive() {
        let schema = SchemaQuery::load(&build_fixture_schema()).expect("load schema");
        let result = schema.columns("PATIENTS").expect("query columns");
        assert_eq!(result["table"], "patients");
        assert_eq!(result["record_count"], 2);

        let result = schema.values("Visits.PATIENTS_ID").expect("query values");
        assert_eq!(result["values"], serde_json::json!(["1"]));
    }

    #[test]
    fn where_value_finds_every_occurrence() {
        let schema = SchemaQuery::load(&build_fixture_schema()).expect("load schema");
        let result = schema.where_value("1");
        let occurrences = result["occurrences"].as_array().expect("occurrences");
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[0]["table"], "patients");
        assert_eq!(occurrences[1]["table"], "visits");
    }

    #[test]
    fn malformed_values_target_is_a_usage_error() {
        let schema = SchemaQuery::load(&build_fixture_schema()).expect("load schema");
        assert!(matches!(
            schema.values("no_dot_here"),
            Err(QueryError::Usage(_))
        ));
        assert!(matches!(
            schema.values("ghost.patients_id"),
            Err(QueryError::UnknownTable(_))
        ));
    }

    #[test]
    fn values_requires_the_column_in_that_table() {
        let schema_dir = build_fixture_schema();
        let schema = SchemaQuery::load(&schema_dir).expect("load schema");
        // `name` exists only in patients; visits.name should fail.
        assert!(schema.values("visits.name").is_err());
        assert!(schema.values("patients.name").is_ok());
    }
}
