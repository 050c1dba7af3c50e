use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use datamend_core::values::{is_numeric, parse_date, round2};
use datamend_core::{ColumnKind, SCHEMA_VERSION, Table, TableSchema, list_tables, read_table};

use crate::errors::EvalError;
use crate::metrics::{
    AggregateQuality, METRICS_VERSION, PerformanceMetrics, QualityMetrics, TableQuality,
    WarningItem,
};
use crate::model::{EvaluateOptions, EvaluationResult};
use crate::report::render_report;

/// Evaluate a dataset directory against the built schema.
#[derive(Debug, Clone, Default)]
pub struct QualityEngine {
    options: EvaluateOptions,
}

impl QualityEngine {
    pub fn new(options: EvaluateOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, schema_dir: &Path, dataset_dir: &Path) -> Result<EvaluationResult, EvalError> {
        let total_start = Instant::now();
        let load_start = Instant::now();

        let run_id = Uuid::new_v4().to_string();
        let schemas = load_schemas(schema_dir)?;
        let mut warnings = Vec::new();

        let mut tables = Vec::new();
        for path in list_tables(dataset_dir)? {
            match read_table(&path) {
                Ok(table) => tables.push(table),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable table");
                    warnings.push(WarningItem {
                        code: "unreadable_table".to_string(),
                        path: path.display().to_string(),
                        message: err.to_string(),
                        hint: Some("check CSV encoding and permissions".to_string()),
                    });
                }
            }
        }

        let load_ms = load_start.elapsed().as_millis();
        let score_start = Instant::now();

        info!(
            run_id = %run_id,
            variant = %self.options.variant,
            tables = tables.len(),
            "evaluation started"
        );

        let mut table_scores = Vec::new();
        for table in &tables {
            let schema = schemas.get(&table.name);
            if schema.is_none() {
                warnings.push(WarningItem {
                    code: "missing_schema_table".to_string(),
                    path: table.name.clone(),
                    message: "no schema document for table".to_string(),
                    hint: Some("rerun profiling on the original dataset".to_string()),
                });
            }
            if table.rows.is_empty() {
                warnings.push(WarningItem {
                    code: "empty_table".to_string(),
                    path: table.name.clone(),
                    message: "table has no rows; scores are vacuous".to_string(),
                    hint: None,
                });
            }
            table_scores.push(score_table(table, schema)?);
        }
        table_scores.sort_by(|a, b| a.table.cmp(&b.table));
        sort_warnings(&mut warnings);

        let aggregate = aggregate_scores(&table_scores);
        let score_ms = score_start.elapsed().as_millis();
        let total_ms = total_start.elapsed().as_millis();

        let metrics = QualityMetrics {
            metrics_version: METRICS_VERSION.to_string(),
            run_id: run_id.clone(),
            dataset: dataset_dir.display().to_string(),
            variant: self.options.variant.clone(),
            schema_version: SCHEMA_VERSION.to_string(),
            tables: table_scores,
            aggregate,
            warnings,
            performance: PerformanceMetrics {
                load_ms,
                score_ms,
                total_ms,
            },
        };

        let report = render_report(&metrics);
        let out_dir = match &self.options.out_dir {
            Some(dir) => dir.clone(),
            None => PathBuf::from("quality").join(&self.options.variant),
        };
        fs::create_dir_all(&out_dir)?;

        let metrics_path = out_dir.join("metrics.json");
        fs::write(&metrics_path, serde_json::to_vec_pretty(&metrics)?)?;

        let report_path = out_dir.join("report.md");
        fs::write(&report_path, report.as_bytes())?;

        info!(
            run_id = %run_id,
            variant = %self.options.variant,
            score = metrics.aggregate.score,
            "evaluation finished"
        );

        Ok(EvaluationResult {
            out_dir,
            metrics_path,
            report_path,
            metrics,
            report,
        })
    }
}

/// Score the four quality dimensions for one table.
fn score_table(table: &Table, schema: Option<&TableSchema>) -> Result<TableQuality, EvalError> {
    let total_cells = table.cell_count();
    let mut non_empty_cells = 0u64;
    for row in &table.rows {
        non_empty_cells += row.iter().filter(|cell| !cell.trim().is_empty()).count() as u64;
    }
    let completeness = ratio(non_empty_cells, total_cells);

    let mut typed_checked = 0u64;
    let mut typed_conforming = 0u64;
    let mut regex_checked = 0u64;
    let mut regex_conforming = 0u64;

    if let Some(schema) = schema {
        for (index, header) in table.headers.iter().enumerate() {
            let Some(profile) = schema.columns.get(header) else {
                continue;
            };
            let rule = profile
                .regex
                .as_deref()
                .map(Regex::new)
                .transpose()?;

            for cell in table.column_values(index) {
                if cell.trim().is_empty() {
                    continue;
                }
                match profile.kind {
                    ColumnKind::Numeric => {
                        typed_checked += 1;
                        if is_numeric(cell) {
                            typed_conforming += 1;
                        }
                    }
                    ColumnKind::Date => {
                        typed_checked += 1;
                        if parse_date(cell).is_some() {
                            typed_conforming += 1;
                        }
                    }
                    ColumnKind::Text => {}
                }
                if let Some(rule) = &rule {
                    regex_checked += 1;
                    if rule.is_match(cell) {
                        regex_conforming += 1;
                    }
                }
            }
        }
    }

    let consistency = ratio(typed_conforming, typed_checked);
    let validity = ratio(regex_conforming, regex_checked);

    let mut distinct_rows = HashSet::new();
    for row in &table.rows {
        distinct_rows.insert(row.clone());
    }
    let uniqueness = ratio(distinct_rows.len() as u64, table.rows.len() as u64);

    let primary_key_uniqueness = schema
        .and_then(|schema| schema.primary_key.as_deref())
        .and_then(|key| table.column_index(key))
        .map(|index| {
            let values: HashSet<&str> = table.column_values(index).collect();
            ratio(values.len() as u64, table.rows.len() as u64)
        });

    let score = round2((completeness + consistency + uniqueness + validity) / 4.0);

    Ok(TableQuality {
        table: table.name.clone(),
        rows_found: table.rows.len() as u64,
        completeness,
        consistency,
        uniqueness,
        validity,
        score,
        primary_key_uniqueness,
    })
}

/// Percentage with the vacuous case scoring 100.
fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        100.0
    } else {
        round2(part as f64 / total as f64 * 100.0)
    }
}

/// Unweighted mean across tables, matching per-table score averaging.
fn aggregate_scores(tables: &[TableQuality]) -> AggregateQuality {
    if tables.is_empty() {
        return AggregateQuality {
            tables_scored: 0,
            completeness: 100.0,
            consistency: 100.0,
            uniqueness: 100.0,
            validity: 100.0,
            score: 100.0,
        };
    }
    let count = tables.len() as f64;
    let mean = |pick: fn(&TableQuality) -> f64| -> f64 {
        round2(tables.iter().map(pick).sum::<f64>() / count)
    };
    AggregateQuality {
        tables_scored: tables.len() as u64,
        completeness: mean(|table| table.completeness),
        consistency: mean(|table| table.consistency),
        uniqueness: mean(|table| table.uniqueness),
        validity: mean(|table| table.validity),
        score: mean(|table| table.score),
    }
}

/// Load every table schema document from `schema/tables/`.
fn load_schemas(schema_dir: &Path) -> Result<BTreeMap<String, TableSchema>, EvalError> {
    let tables_dir = schema_dir.join("tables");
    if !tables_dir.is_dir() {
        return Err(EvalError::InvalidDataset(format!(
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

fn sort_warnings(warnings: &mut Vec<WarningItem>) {
    warnings
        .sort_by(|a, b| (a.path.clone(), a.code.clone()).cmp(&(b.path.clone(), b.code.clone())));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacuous_ratio_scores_full() {
        assert_eq!(ratio(0, 0), 100.0);
        assert_eq!(ratio(5, 6), 83.33);
        assert_eq!(ratio(3, 3), 100.0);
    }

    #[test]
    fn unscored_dimensions_default_to_full_marks() {
        let table = Table {
            name: "notes".to_string(),
            headers: vec!["text".to_string()],
            rows: vec![vec!["hello".to_string()], vec!["world".to_string()]],
        };
        let quality = score_table(&table, None).expect("score table");
        assert_eq!(quality.completeness, 100.0);
        assert_eq!(quality.consistency, 100.0);
        assert_eq!(quality.uniqueness, 100.0);
        assert_eq!(quality.validity, 100.0);
        assert!(quality.primary_key_uniqueness.is_none());
    }
}
