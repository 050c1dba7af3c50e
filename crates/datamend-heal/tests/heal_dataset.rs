use std::fs;
use std::path::PathBuf;

use datamend_core::{Table, read_table, write_table};
use datamend_heal::{HealEngine, HealOptions, ImputationStrategy};
use datamend_profile::{ProfileOptions, SchemaBuilder};

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("datamend_heal_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn build_schema(dataset: &PathBuf) -> PathBuf {
    let schema_dir = temp_dir("schema");
    let options = ProfileOptions {
        schema_dir: schema_dir.clone(),
        ..ProfileOptions::default()
    };
    SchemaBuilder::new(options)
        .run(dataset)
        .expect("profile dataset");
    schema_dir
}

fn run_heal(schema_dir: &PathBuf, dataset: &PathBuf, strategy: ImputationStrategy) -> PathBuf {
    let out_dir = temp_dir("healed");
    let options = HealOptions {
        out_dir: Some(out_dir.clone()),
        numeric_imputation: strategy,
    };
    HealEngine::new(options)
        .run(schema_dir, dataset)
        .expect("heal dataset");
    out_dir
}

fn write_clean_dataset(dir: &PathBuf) {
    let measurements = Table {
        name: "measurements".to_string(),
        headers: vec![
            "measurements_id".to_string(),
            "value".to_string(),
            "taken_on".to_string(),
            "unit".to_string(),
        ],
        rows: vec![
            vec!["1".into(), "10".into(), "2024-01-10".into(), "mg/dL".into()],
            vec!["2".into(), "20".into(), "2024-01-11".into(), "mg/dL".into()],
            vec!["3".into(), "30".into(), "2024-01-12".into(), "mmol/L".into()],
            vec!["4".into(), "40".into(), "2024-01-13".into(), "mg/dL".into()],
        ],
    };
    write_table(&dir.join("measurements.csv"), &measurements).expect("write measurements");
}

#[test]
fn healing_clean_input_is_a_noop() {
    let dataset = temp_dir("clean");
    write_clean_dataset(&dataset);
    let schema_dir = build_schema(&dataset);

    let out_dir = run_heal(&schema_dir, &dataset, ImputationStrategy::Mean);

    let original = fs::read(dataset.join("measurements.csv")).expect("read original");
    let healed = fs::read(out_dir.join("measurements.csv")).expect("read healed");
    assert_eq!(original, healed);
}

#[test]
fn empty_numeric_cells_get_the_column_mean() {
    let dataset = temp_dir("clean");
    write_clean_dataset(&dataset);
    let schema_dir = build_schema(&dataset);

    let damaged_dir = temp_dir("damaged");
    let mut table = read_table(&dataset.join("measurements.csv")).expect("read clean");
    table.rows[1][1].clear();
    write_table(&damaged_dir.join("measurements.csv"), &table).expect("write damaged");

    let out_dir = run_heal(&schema_dir, &damaged_dir, ImputationStrategy::Mean);
    let healed = read_table(&out_dir.join("measurements.csv")).expect("read healed");

    // Mean of 10, 20, 30, 40 from the clean profile, at integer scale.
    assert_eq!(healed.rows[1][1], "25");
}

#[test]
fn median_strategy_uses_the_column_median() {
    let dataset = temp_dir("clean");
    write_clean_dataset(&dataset);
    let schema_dir = build_schema(&dataset);

    let damaged_dir = temp_dir("damaged");
    let mut table = read_table(&dataset.join("measurements.csv")).expect("read clean");
    table.rows[0][1].clear();
    write_table(&damaged_dir.join("measurements.csv"), &table).expect("write damaged");

    let out_dir = run_heal(&schema_dir, &damaged_dir, ImputationStrategy::Median);
    let healed = read_table(&out_dir.join("measurements.csv")).expect("read healed");

    assert_eq!(healed.rows[0][1], "25");
}

#[test]
fn empty_categorical_cells_get_the_mode() {
    let dataset = temp_dir("clean");
    write_clean_dataset(&dataset);
    let schema_dir = build_schema(&dataset);

    let damaged_dir = temp_dir("damaged");
    let mut table = read_table(&dataset.join("measurements.csv")).expect("read clean");
    table.rows[2][3].clear();
    write_table(&damaged_dir.join("measurements.csv"), &table).expect("write damaged");

    let out_dir = run_heal(&schema_dir, &damaged_dir, ImputationStrategy::Mean);
    let healed = read_table(&out_dir.join("measurements.csv")).expect("read healed");

    assert_eq!(healed.rows[2][3], "mg/dL");
}

#[test]
fn corrupted_formats_are_normalized() {
    let dataset = temp_dir("clean");
    write_clean_dataset(&dataset);
    let schema_dir = build_schema(&dataset);

    let damaged_dir = temp_dir("damaged");
    let mut table = read_table(&dataset.join("measurements.csv")).expect("read clean");
    table.rows[0][2] = "10.01.2024".to_string();
    table.rows[1][1] = "2#0".to_string();
    table.rows[2][1] = "  30 ".to_string();
    write_table(&damaged_dir.join("measurements.csv"), &table).expect("write damaged");

    let out_dir = run_heal(&schema_dir, &damaged_dir, ImputationStrategy::Mean);
    let healed = read_table(&out_dir.join("measurements.csv")).expect("read healed");

    assert_eq!(healed.rows[0][2], "2024-01-10");
    assert_eq!(healed.rows[1][1], "20");
    assert_eq!(healed.rows[2][1], "30");
}

#[test]
fn no_exact_duplicates_remain_after_healing() {
    let dataset = temp_dir("clean");
    write_clean_dataset(&dataset);
    let schema_dir = build_schema(&dataset);

    let damaged_dir = temp_dir("damaged");
    let mut table = read_table(&dataset.join("measurements.csv")).expect("read clean");
    let duplicate = table.rows[0].clone();
    table.rows.push(duplicate.clone());
    table.rows.push(duplicate);
    write_table(&damaged_dir.join("measurements.csv"), &table).expect("write damaged");

    let out_dir = run_heal(&schema_dir, &damaged_dir, ImputationStrategy::Mean);
    let healed = read_table(&out_dir.join("measurements.csv")).expect("read healed");

    assert_eq!(healed.rows.len(), 4);
    let mut seen = std::collections::HashSet::new();
    for row in &healed.rows {
        assert!(seen.insert(row.clone()), "duplicate row survived healing");
    }
}
