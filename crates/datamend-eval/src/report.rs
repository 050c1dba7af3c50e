use crate::metrics::QualityMetrics;

/// Render a deterministic markdown report from quality metrics.
pub fn render_report(metrics: &QualityMetrics) -> String {
    let mut lines = Vec::new();

    lines.push("# Datamend Quality Report".to_string());
    lines.push(String::new());
    lines.push("## Run summary".to_string());
    lines.push(format!("- run_id: {}", metrics.run_id));
    lines.push(format!("- dataset: {}", metrics.dataset));
    lines.push(format!("- variant: {}", metrics.variant));
    lines.push(format!("- schema_version: {}", metrics.schema_version));
    lines.push(String::new());

    lines.push("## Table scores".to_string());
    lines.push(
        "| table | rows | completeness | consistency | uniqueness | validity | score |"
            .to_string(),
    );
    lines.push("| --- | --- | --- | --- | --- | --- | --- |".to_string());
    for table in &metrics.tables {
        lines.push(format!(
            "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |",
            table.table,
            table.rows_found,
            table.completeness,
            table.consistency,
            table.uniqueness,
            table.validity,
            table.score
        ));
    }
    lines.push(String::new());

    lines.push("## Aggregate".to_string());
    lines.push(format!("- tables_scored: {}", metrics.aggregate.tables_scored));
    lines.push(format!("- completeness: {:.2}", metrics.aggregate.completeness));
    lines.push(format!("- consistency: {:.2}", metrics.aggregate.consistency));
    lines.push(format!("- uniqueness: {:.2}", metrics.aggregate.uniqueness));
    lines.push(format!("- validity: {:.2}", metrics.aggregate.validity));
    lines.push(format!("- score: {:.2}", metrics.aggregate.score));
    lines.push(String::new());

    if !metrics.warnings.is_empty() {
        lines.push("## Warnings".to_string());
        for warning in &metrics.warnings {
            let hint = warning
                .hint
                .as_ref()
                .map(|hint| format!(" (hint: {hint})"))
                .unwrap_or_default();
            lines.push(format!("- {}: {}{}", warning.path, warning.message, hint));
        }
        lines.push(String::new());
    }

    lines.push("## Recommendations".to_string());
    lines.extend(recommendations(metrics));
    lines.join("\n")
}

fn recommendations(metrics: &QualityMetrics) -> Vec<String> {
    let mut lines = Vec::new();
    if metrics.aggregate.completeness < 100.0 {
        lines.push("- impute or source the missing values before analysis.".to_string());
    }
    if metrics.aggregate.consistency < 100.0 || metrics.aggregate.validity < 100.0 {
        lines.push("- normalize malformed values against the column format rules.".to_string());
    }
    if metrics.aggregate.uniqueness < 100.0 {
        lines.push("- deduplicate repeated rows before analysis.".to_string());
    }
    if lines.is_empty() {
        lines.push("- no defects detected; compare variants for drift.".to_string());
    }
    lines
}
