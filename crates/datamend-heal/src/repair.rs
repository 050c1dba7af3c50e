use datamend_core::values::{is_null_like, parse_date, parse_numeric};
use datamend_core::{ColumnKind, ColumnProfile};

use crate::model::ImputationStrategy;

/// Date renderings accepted during healing beyond the profiling formats.
const EXTRA_DATE_FORMATS: [&str; 2] = ["%d.%m.%Y", "%d-%m-%Y"];

/// Outcome of normalizing one cell against its column's format rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalization {
    /// The cell already conforms.
    Unchanged,
    /// The cell was rewritten into the expected format.
    Rewritten(String),
    /// No rewrite applies; the cell should be blanked.
    Dropped,
}

/// Normalize a non-empty cell that violates its column regex.
pub fn normalize_cell(profile: &ColumnProfile, value: &str) -> Normalization {
    match profile.kind {
        ColumnKind::Numeric => normalize_numeric(value),
        ColumnKind::Date => normalize_date(value),
        ColumnKind::Text => Normalization::Unchanged,
    }
}

fn normalize_numeric(value: &str) -> Normalization {
    if let Some(stripped) = strip_to_numeric(value) {
        Normalization::Rewritten(stripped)
    } else {
        Normalization::Dropped
    }
}

/// Remove junk characters, keeping sign, digits, and the decimal point.
fn strip_to_numeric(value: &str) -> Option<String> {
    let stripped: String = value
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();
    parse_numeric(&stripped).map(|_| stripped)
}

fn normalize_date(value: &str) -> Normalization {
    let trimmed = value.trim();
    if let Some(date) = parse_date(trimmed) {
        return Normalization::Rewritten(date.format("%Y-%m-%d").to_string());
    }
    for format in EXTRA_DATE_FORMATS {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, format) {
            return Normalization::Rewritten(date.format("%Y-%m-%d").to_string());
        }
    }
    // Junk-corrupted ISO dates ("2024-#01-10") recover after stripping.
    let stripped: String = trimmed
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '-' || *ch == '/')
        .collect();
    if let Some(date) = parse_date(&stripped) {
        return Normalization::Rewritten(date.format("%Y-%m-%d").to_string());
    }
    Normalization::Dropped
}

/// Pick the imputation value for an empty cell, from column statistics.
pub fn imputation_value(profile: &ColumnProfile, strategy: ImputationStrategy) -> Option<String> {
    match profile.kind {
        ColumnKind::Numeric => {
            let stats = profile.numeric_stats.as_ref()?;
            let value = match strategy {
                ImputationStrategy::Mean => stats.mean,
                ImputationStrategy::Median => stats.median,
            };
            Some(format_numeric(value, modal_scale(profile)))
        }
        ColumnKind::Date => {
            let mode = modal_value(profile)?;
            // Render the mode in the column's expected format.
            match parse_date(&mode) {
                Some(date) => Some(date.format("%Y-%m-%d").to_string()),
                None => Some(mode),
            }
        }
        ColumnKind::Text => modal_value(profile),
    }
}

/// Most frequent non-null value; ties already resolved (count desc, value
/// asc) when the profile was built.
fn modal_value(profile: &ColumnProfile) -> Option<String> {
    profile
        .most_common_values
        .iter()
        .find(|entry| !is_null_like(&entry.value) && !entry.value.trim().is_empty())
        .map(|entry| entry.value.clone())
}

/// Modal decimal scale of the recorded sample values.
fn modal_scale(profile: &ColumnProfile) -> u32 {
    let mut counts: std::collections::BTreeMap<u32, u32> = std::collections::BTreeMap::new();
    for value in &profile.sample_values {
        if let Some(scale) = datamend_core::values::decimal_scale(value) {
            *counts.entry(scale).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1))
        .map(|(scale, _)| scale)
        .unwrap_or(2)
}

fn format_numeric(value: f64, scale: u32) -> String {
    format!("{value:.precision$}", precision = scale as usize)
}
