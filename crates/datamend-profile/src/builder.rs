use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use datamend_core::{
    ColumnCatalog, SCHEMA_VERSION, Table, TableSchema, convention_primary_key, list_tables,
    read_table, validate_table_schema,
};

use crate::errors::ProfileError;
use crate::model::{ProfileOptions, ProfileReport, SkippedFile, TableSummary};
use crate::stats::build_column_profile;

/// Result of a profiling run.
#[derive(Debug, Clone)]
pub struct ProfileResult {
    pub schema_dir: PathBuf,
    pub report_path: PathBuf,
    pub report: ProfileReport,
}

/// Entry point for building schema artifacts from a dataset directory.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    options: ProfileOptions,
}

impl SchemaBuilder {
    pub fn new(options: ProfileOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, dataset_dir: &Path) -> Result<ProfileResult, ProfileError> {
        let run_id = Uuid::new_v4().to_string();
        let tables_dir = self.options.schema_dir.join("tables");
        let columns_dir = self.options.schema_dir.join("columns");
        fs::create_dir_all(&tables_dir)?;
        fs::create_dir_all(&columns_dir)?;

        let paths = list_tables(dataset_dir)?;
        let table_names: Vec<String> = paths
            .iter()
            .filter_map(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().to_string())
            .collect();

        info!(run_id = %run_id, tables = paths.len(), "profiling started");

        let mut report = ProfileReport {
            run_id: run_id.clone(),
            dataset_dir: dataset_dir.to_path_buf(),
            tables: Vec::new(),
            columns_cataloged: 0,
            skipped: Vec::new(),
        };
        let mut catalogs: BTreeMap<String, ColumnCatalog> = BTreeMap::new();

        for path in &paths {
            let table = match read_table(path) {
                Ok(table) => table,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable table");
                    report.skipped.push(SkippedFile {
                        path: path.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            info!(table = %table.name, rows = table.rows.len(), "profiling table");

            let schema = self.profile_table(&table, &table_names);
            validate_table_schema(&schema)?;

            let schema_path = tables_dir.join(format!("{}.json", table.name));
            write_json(&schema_path, &schema)?;

            self.catalog_table(&table, &mut catalogs);

            report.tables.push(TableSummary {
                table: table.name.clone(),
                record_count: schema.record_count,
                columns: schema.columns.len() as u64,
            });
        }

        for (column_name, catalog) in &mut catalogs {
            catalog.compute_overlaps();
            let catalog_path = columns_dir.join(format!("{column_name}.json"));
            write_json(&catalog_path, catalog)?;
        }
        report.columns_cataloged = catalogs.len() as u64;

        let report_path = self.options.schema_dir.join("profile_report.json");
        write_json(&report_path, &report)?;

        info!(
            run_id = %run_id,
            tables = report.tables.len(),
            columns = report.columns_cataloged,
            skipped = report.skipped.len(),
            "profiling finished"
        );

        Ok(ProfileResult {
            schema_dir: self.options.schema_dir.clone(),
            report_path,
            report,
        })
    }

    fn profile_table(&self, table: &Table, table_names: &[String]) -> TableSchema {
        let mut columns = BTreeMap::new();
        for (index, header) in table.headers.iter().enumerate() {
            let values: Vec<&str> = table.column_values(index).collect();
            let mut profile =
                build_column_profile(&values, self.options.top_values, self.options.sample_values);
            profile.primary_key = is_primary_key(header, &table.name);
            profile.foreign_key = is_foreign_key(header, &table.name, table_names);
            columns.insert(header.clone(), profile);
        }

        let convention_pk = convention_primary_key(&table.name);
        let primary_key = table
            .headers
            .iter()
            .any(|header| header.eq_ignore_ascii_case(&convention_pk))
            .then_some(convention_pk);

        TableSchema {
            schema_version: SCHEMA_VERSION.to_string(),
            table_name: table.name.clone(),
            record_count: table.rows.len() as u64,
            primary_key,
            columns,
        }
    }

    fn catalog_table(&self, table: &Table, catalogs: &mut BTreeMap<String, ColumnCatalog>) {
        for (index, header) in table.headers.iter().enumerate() {
            let values: BTreeSet<String> = table
                .column_values(index)
                .filter(|value| !value.trim().is_empty())
                .map(|value| value.to_string())
                .collect();
            catalogs
                .entry(header.clone())
                .or_insert_with(|| ColumnCatalog::new(header.clone()))
                .insert_table(table.name.clone(), values);
        }
    }
}

/// Convention heuristic: a column named `<table>_id` is the primary key.
fn is_primary_key(column: &str, table: &str) -> bool {
    column.eq_ignore_ascii_case(&convention_primary_key(table))
}

/// Convention heuristic: a column named `<other_table>_id` is a foreign key.
fn is_foreign_key(column: &str, table: &str, table_names: &[String]) -> bool {
    table_names
        .iter()
        .filter(|name| !name.eq_ignore_ascii_case(table))
        .any(|name| column.eq_ignore_ascii_case(&convention_primary_key(name)))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ProfileError> {
    fs::write(path, serde_json::to_vec_pretty(value)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_heuristics_follow_naming_convention() {
        let tables = vec!["patients".to_string(), "visits".to_string()];
        assert!(is_primary_key("patients_id", "patients"));
        assert!(is_primary_key("PATIENTS_ID", "patients"));
        assert!(!is_primary_key("visits_id", "patients"));
        assert!(is_foreign_key("patients_id", "visits", &tables));
        assert!(!is_foreign_key("patients_id", "patients", &tables));
        assert!(!is_foreign_key("name", "visits", &tables));
    }
}
