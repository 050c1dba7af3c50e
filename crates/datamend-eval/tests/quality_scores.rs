use std::fs;
use std::path::PathBuf;

use datamend_core::{Table, write_table};
use datamend_damage::{DamageEngine, DamageOptions, DamagePlan};
use datamend_eval::{EvaluateOptions, QualityEngine, QualityMetrics};
use datamend_profile::{ProfileOptions, SchemaBuilder};

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("datamend_eval_{label}_{}", uuid::Uuid::new_v4()));
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

fn evaluate(schema_dir: &PathBuf, dataset: &PathBuf, variant: &str) -> QualityMetrics {
    let out_dir = temp_dir("quality");
    let options = EvaluateOptions {
        variant: variant.to_string(),
        out_dir: Some(out_dir),
    };
    QualityEngine::new(options)
        .run(schema_dir, dataset)
        .expect("evaluate dataset")
        .metrics
}

#[test]
fn one_missing_cell_in_three_by_two_scores_five_sixths() {
    let dataset = temp_dir("dataset");
    let table = Table {
        name: "vitals".to_string(),
        headers: vec!["pulse".to_string(), "spo2".to_string()],
        rows: vec![
            vec!["72".to_string(), "98".to_string()],
            vec!["80".to_string(), String::new()],
            vec!["64".to_string(), "97".to_string()],
        ],
    };
    write_table(&dataset.join("vitals.csv"), &table).expect("write vitals");
    let schema_dir = build_schema(&dataset);

    let metrics = evaluate(&schema_dir, &dataset, "original");
    assert_eq!(metrics.tables.len(), 1);
    assert_eq!(metrics.tables[0].completeness, 83.33);
}

#[test]
fn damage_never_improves_completeness() {
    let dataset = temp_dir("dataset");
    let table = Table {
        name: "patients".to_string(),
        headers: vec!["patients_id".to_string(), "name".to_string()],
        rows: (1..=30)
            .map(|idx| vec![idx.to_string(), format!("Patient {idx}")])
            .collect(),
    };
    write_table(&dataset.join("patients.csv"), &table).expect("write patients");
    let schema_dir = build_schema(&dataset);

    let mut plan = DamagePlan::noop(21);
    plan.rates.missing = 0.25;
    let damaged_dir = temp_dir("damaged");
    DamageEngine::new(DamageOptions {
        out_dir: Some(damaged_dir.clone()),
    })
    .run(&plan, &dataset)
    .expect("damage dataset");

    let original = evaluate(&schema_dir, &dataset, "original");
    let damaged = evaluate(&schema_dir, &damaged_dir, "damaged");

    assert_eq!(original.aggregate.completeness, 100.0);
    assert!(damaged.aggregate.completeness <= original.aggregate.completeness);
    assert!(damaged.aggregate.completeness < 100.0);
}

#[test]
fn duplicates_lower_uniqueness_and_pk_detail() {
    let dataset = temp_dir("dataset");
    let table = Table {
        name: "patients".to_string(),
        headers: vec!["patients_id".to_string(), "name".to_string()],
        rows: vec![
            vec!["1".to_string(), "Alice".to_string()],
            vec!["2".to_string(), "Bob".to_string()],
            vec!["2".to_string(), "Bob".to_string()],
            vec!["3".to_string(), "Cara".to_string()],
        ],
    };
    write_table(&dataset.join("patients.csv"), &table).expect("write patients");
    let schema_dir = build_schema(&dataset);

    let metrics = evaluate(&schema_dir, &dataset, "original");
    let patients = &metrics.tables[0];
    assert_eq!(patients.uniqueness, 75.0);
    assert_eq!(patients.primary_key_uniqueness, Some(75.0));
}

#[test]
fn malformed_values_lower_consistency_and_validity() {
    let dataset = temp_dir("dataset");
    let table = Table {
        name: "labs".to_string(),
        headers: vec!["value".to_string(), "drawn_on".to_string()],
        rows: vec![
            vec!["10".to_string(), "2024-01-10".to_string()],
            vec!["oops".to_string(), "2024-01-11".to_string()],
            vec!["30".to_string(), "2024/01/11".to_string()],
            vec!["40".to_string(), "2024-01-12".to_string()],
        ],
    };
    write_table(&dataset.join("labs.csv"), &table).expect("write labs");

    // Profile a clean twin so the schema says numeric + date.
    let clean = temp_dir("clean");
    let clean_table = Table {
        name: "labs".to_string(),
        headers: table.headers.clone(),
        rows: vec![
            vec!["10".to_string(), "2024-01-10".to_string()],
            vec!["20".to_string(), "2024-01-11".to_string()],
            vec!["30".to_string(), "2024-01-12".to_string()],
            vec!["40".to_string(), "2024-01-13".to_string()],
        ],
    };
    write_table(&clean.join("labs.csv"), &clean_table).expect("write clean labs");
    let schema_dir = build_schema(&clean);

    let metrics = evaluate(&schema_dir, &dataset, "damaged");
    let labs = &metrics.tables[0];
    // One of four numeric cells fails the type check; dates all parse.
    assert_eq!(labs.consistency, 87.5);
    // The non-ISO date additionally fails the format rule.
    assert_eq!(labs.validity, 75.0);
    assert_eq!(labs.completeness, 100.0);
}

#[test]
fn report_artifacts_are_written() {
    let dataset = temp_dir("dataset");
    let table = Table {
        name: "vitals".to_string(),
        headers: vec!["pulse".to_string()],
        rows: vec![vec!["72".to_string()]],
    };
    write_table(&dataset.join("vitals.csv"), &table).expect("write vitals");
    let schema_dir = build_schema(&dataset);

    let out_dir = temp_dir("quality");
    let options = EvaluateOptions {
        variant: "original".to_string(),
        out_dir: Some(out_dir.clone()),
    };
    let result = QualityEngine::new(options)
        .run(&schema_dir, &dataset)
        .expect("evaluate dataset");

    assert!(result.metrics_path.exists());
    assert!(result.report_path.exists());
    let report = fs::read_to_string(&result.report_path).expect("read report");
    assert!(report.contains("# Datamend Quality Report"));
    assert!(report.contains("| vitals |"));
}
