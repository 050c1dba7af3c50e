use std::fs;
use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use uuid::Uuid;

use datamend_core::{Table, list_tables, read_table, write_table};

use crate::corrupt::corrupt_value;
use crate::errors::DamageError;
use crate::model::{DamageOptions, DamageReport, TableDamageReport};
use crate::plan::DamagePlan;

/// Result of a damage run.
#[derive(Debug, Clone)]
pub struct DamageResult {
    pub out_dir: PathBuf,
    pub report_path: PathBuf,
    pub report: DamageReport,
}

/// Entry point for injecting defects into a dataset.
#[derive(Debug, Clone, Default)]
pub struct DamageEngine {
    options: DamageOptions,
}

impl DamageEngine {
    pub fn new(options: DamageOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, plan: &DamagePlan, dataset_dir: &Path) -> Result<DamageResult, DamageError> {
        plan.validate()?;

        let run_id = Uuid::new_v4().to_string();
        let out_dir = match &self.options.out_dir {
            Some(dir) => dir.clone(),
            None => sibling_dir(dataset_dir, "_damaged")?,
        };
        fs::create_dir_all(&out_dir)?;

        let mut report = DamageReport {
            run_id: run_id.clone(),
            seed: plan.seed,
            plan_hash: plan.fingerprint(),
            tables: Vec::new(),
            cells_blanked_total: 0,
            cells_corrupted_total: 0,
            rows_duplicated_total: 0,
        };

        info!(run_id = %run_id, seed = plan.seed, "damage started");

        for path in list_tables(dataset_dir)? {
            let table = match read_table(&path) {
                Ok(table) => table,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable table");
                    continue;
                }
            };

            let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(plan.seed, &table.name));
            let (damaged, table_report) = damage_table(&table, plan, &mut rng);

            write_table(&out_dir.join(format!("{}.csv", table.name)), &damaged)?;

            info!(
                table = %table.name,
                cells_blanked = table_report.cells_blanked,
                cells_corrupted = table_report.cells_corrupted,
                rows_duplicated = table_report.rows_duplicated,
                "damaged table"
            );

            report.cells_blanked_total += table_report.cells_blanked;
            report.cells_corrupted_total += table_report.cells_corrupted;
            report.rows_duplicated_total += table_report.rows_duplicated;
            report.tables.push(table_report);
        }

        let report_path = out_dir.join("damage_report.json");
        fs::write(&report_path, serde_json::to_vec_pretty(&report)?)?;

        info!(
            run_id = %run_id,
            cells_blanked = report.cells_blanked_total,
            cells_corrupted = report.cells_corrupted_total,
            rows_duplicated = report.rows_duplicated_total,
            "damage finished"
        );

        Ok(DamageResult {
            out_dir,
            report_path,
            report,
        })
    }
}

/// Apply the plan's defects to one table with an already-seeded rng.
fn damage_table(
    table: &Table,
    plan: &DamagePlan,
    rng: &mut ChaCha8Rng,
) -> (Table, TableDamageReport) {
    let mut report = TableDamageReport {
        table: table.name.clone(),
        rows_in: table.rows.len() as u64,
        rows_out: 0,
        cells_blanked: 0,
        cells_corrupted: 0,
        rows_duplicated: 0,
    };

    let mut rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let mut damaged = row.clone();
        for cell in &mut damaged {
            if draw(rng, plan.rates.missing) {
                if !cell.is_empty() {
                    report.cells_blanked += 1;
                }
                cell.clear();
                continue;
            }
            if !cell.is_empty() && draw(rng, plan.rates.format_corruption) {
                *cell = corrupt_value(rng, cell);
                report.cells_corrupted += 1;
            }
        }

        rows.push(damaged.clone());
        if draw(rng, plan.rates.duplicate_row) {
            rows.push(damaged);
            report.rows_duplicated += 1;
        }
    }
    report.rows_out = rows.len() as u64;

    (
        Table {
            name: table.name.clone(),
            headers: table.headers.clone(),
            rows,
        },
        report,
    )
}

/// Bernoulli draw that consumes no randomness for the zero rate.
///
/// Skipping the draw keeps the defect streams aligned between a noop plan
/// and a plan that only enables some defect types.
fn draw(rng: &mut ChaCha8Rng, rate: f64) -> bool {
    if rate <= 0.0 {
        return false;
    }
    rng.random_bool(rate.min(1.0))
}

/// Derive a per-table seed so output is independent of table order.
fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn sibling_dir(dataset_dir: &Path, suffix: &str) -> Result<PathBuf, DamageError> {
    let name = dataset_dir
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| {
            DamageError::InvalidPlan(format!(
                "cannot derive output directory from {}",
                dataset_dir.display()
            ))
        })?;
    Ok(dataset_dir.with_file_name(format!("{name}{suffix}")))
}
