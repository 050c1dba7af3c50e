use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use datamend_core::{Table, TableSchema, list_tables, read_table, write_table};

use crate::errors::HealError;
use crate::model::{HealOptions, HealReport, TableHealReport};
use crate::repair::{Normalization, imputation_value, normalize_cell};

/// Result of a healing run.
#[derive(Debug, Clone)]
pub struct HealResult {
    pub out_dir: PathBuf,
    pub report_path: PathBuf,
    pub report: HealReport,
}

/// Entry point for healing a damaged dataset against its schema.
#[derive(Debug, Clone, Default)]
pub struct HealEngine {
    options: HealOptions,
}

impl HealEngine {
    pub fn new(options: HealOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, schema_dir: &Path, dataset_dir: &Path) -> Result<HealResult, HealError> {
        let run_id = Uuid::new_v4().to_string();
        let schemas = load_schemas(schema_dir)?;
        let out_dir = match &self.options.out_dir {
            Some(dir) => dir.clone(),
            None => healed_dir(dataset_dir)?,
        };
        fs::create_dir_all(&out_dir)?;

        let mut report = HealReport {
            run_id: run_id.clone(),
            tables: Vec::new(),
            cells_normalized_total: 0,
            cells_dropped_total: 0,
            cells_imputed_total: 0,
            duplicate_rows_removed_total: 0,
        };

        info!(run_id = %run_id, "healing started");

        for path in list_tables(dataset_dir)? {
            let mut table = match read_table(&path) {
                Ok(table) => table,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable table");
                    continue;
                }
            };

            let mut table_report = TableHealReport {
                table: table.name.clone(),
                rows_in: table.rows.len() as u64,
                rows_out: 0,
                cells_normalized: 0,
                cells_dropped: 0,
                cells_imputed: 0,
                cells_unimputable: 0,
                duplicate_rows_removed: 0,
            };

            match schemas.get(&table.name) {
                Some(schema) => {
                    self.heal_table(&mut table, schema, &mut table_report)?;
                }
                None => {
                    warn!(table = %table.name, "no schema document; deduplicating only");
                }
            }
            table_report.duplicate_rows_removed = dedup_rows(&mut table.rows);
            table_report.rows_out = table.rows.len() as u64;

            write_table(&out_dir.join(format!("{}.csv", table.name)), &table)?;

            info!(
                table = %table.name,
                cells_normalized = table_report.cells_normalized,
                cells_dropped = table_report.cells_dropped,
                cells_imputed = table_report.cells_imputed,
                duplicates_removed = table_report.duplicate_rows_removed,
                "healed table"
            );

            report.cells_normalized_total += table_report.cells_normalized;
            report.cells_dropped_total += table_report.cells_dropped;
            report.cells_imputed_total += table_report.cells_imputed;
            report.duplicate_rows_removed_total += table_report.duplicate_rows_removed;
            report.tables.push(table_report);
        }

        let report_path = out_dir.join("heal_report.json");
        fs::write(&report_path, serde_json::to_vec_pretty(&report)?)?;

        info!(
            run_id = %run_id,
            cells_normalized = report.cells_normalized_total,
            cells_imputed = report.cells_imputed_total,
            duplicates_removed = report.duplicate_rows_removed_total,
            "healing finished"
        );

        Ok(HealResult {
            out_dir,
            report_path,
            report,
        })
    }

    /// Normalize formats, then impute empty cells, column by column.
    fn heal_table(
        &self,
        table: &mut Table,
        schema: &TableSchema,
        report: &mut TableHealReport,
    ) -> Result<(), HealError> {
        let headers = table.headers.clone();
        for (index, header) in headers.iter().enumerate() {
            let Some(profile) = schema.columns.get(header) else {
                warn!(table = %table.name, column = %header, "column missing from schema");
                continue;
            };

            let format_rule = profile
                .regex
                .as_deref()
                .map(Regex::new)
                .transpose()?;

            for row in &mut table.rows {
                let cell = &mut row[index];
                if cell.trim().is_empty() {
                    continue;
                }
                let Some(rule) = &format_rule else { continue };
                if rule.is_match(cell) {
                    continue;
                }
                match normalize_cell(profile, cell) {
                    Normalization::Unchanged => {}
                    Normalization::Rewritten(value) => {
                        *cell = value;
                        report.cells_normalized += 1;
                    }
                    Normalization::Dropped => {
                        cell.clear();
                        report.cells_dropped += 1;
                    }
                }
            }

            let fill = imputation_value(profile, self.options.numeric_imputation);
            for row in &mut table.rows {
                let cell = &mut row[index];
                if !cell.trim().is_empty() {
                    continue;
                }
                match &fill {
                    Some(value) => {
                        *cell = value.clone();
                        report.cells_imputed += 1;
                    }
                    None => {
                        report.cells_unimputable += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Remove exact duplicate rows, keeping the first occurrence.
fn dedup_rows(rows: &mut Vec<Vec<String>>) -> u64 {
    let mut seen = HashSet::new();
    let before = rows.len();
    rows.retain(|row| seen.insert(row.clone()));
    (before - rows.len()) as u64
}

/// Load every table schema document from `schema/tables/`.
fn load_schemas(schema_dir: &Path) -> Result<BTreeMap<String, TableSchema>, HealError> {
    let tables_dir = schema_dir.join("tables");
    if !tables_dir.is_dir() {
        return Err(HealError::InvalidSchema(format!(
            "schema tables directory not found: {}",
            tables_dir.display()
        )));
    }

    let mut schemas = BTreeMap::new();
    for entry in fs::read_dir(&tables_dir)? {
        let path = entry?.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        let contents = fs::read_to_string(&path)?;
        let schema: TableSchema = serde_json::from_str(&contents)?;
        schemas.insert(schema.table_name.clone(), schema);
    }
    Ok(schemas)
}

/// Default healed directory: `<name>_healed`, replacing a `_damaged` suffix.
fn healed_dir(dataset_dir: &Path) -> Result<PathBuf, HealError> {
    let name = dataset_dir
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| {
            HealError::InvalidSchema(format!(
                "cannot derive output directory from {}",
                dataset_dir.display()
            ))
        })?;
    let base = name.strip_suffix("_damaged").unwrap_or(&name);
    Ok(dataset_dir.with_file_name(format!("{base}_healed")))
}
