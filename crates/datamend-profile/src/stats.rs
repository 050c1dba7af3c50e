use std::collections::BTreeMap;

use datamend_core::values::{
    ISO_DATE_REGEX, NUMERIC_REGEX, is_null_like, parse_date, parse_numeric, round2,
};
use datamend_core::{ColumnKind, ColumnProfile, DateStats, LengthStats, NumericStats, ValueCount};

/// Share of non-empty values that must parse as numbers for a numeric column.
const NUMERIC_KIND_THRESHOLD: f64 = 0.9;

/// Share of the date sample that must parse for a date column.
const DATE_KIND_THRESHOLD: f64 = 0.5;

/// How many leading non-empty values feed the date detection sample.
const DATE_SAMPLE_SIZE: usize = 100;

/// Compute the full statistics profile for one column's raw values.
pub fn build_column_profile(values: &[&str], top_values: usize, sample_values: usize) -> ColumnProfile {
    let total = values.len() as u64;
    let non_empty: Vec<&str> = values
        .iter()
        .copied()
        .filter(|value| !value.trim().is_empty())
        .collect();
    let non_empty_count = non_empty.len() as u64;

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for value in values {
        *counts.entry(*value).or_insert(0) += 1;
    }
    let unique_count = counts.len() as u64;

    let null_like_count = values.iter().filter(|value| is_null_like(value)).count() as u64;
    let whitespace_only_count = values
        .iter()
        .filter(|value| !value.is_empty() && value.trim().is_empty())
        .count() as u64;

    let most_common_values = top_value_counts(&counts, top_values);
    let samples = first_distinct(&non_empty, sample_values);

    let length_stats = length_stats(&non_empty);
    let numerics: Vec<f64> = non_empty
        .iter()
        .filter_map(|value| parse_numeric(value))
        .collect();
    let numeric_stats = numeric_stats(&numerics);
    let (date_stats, is_date_column) = date_stats(&non_empty);

    let kind = infer_kind(non_empty_count, numerics.len() as u64, is_date_column);
    let regex = match kind {
        ColumnKind::Numeric => Some(NUMERIC_REGEX.to_string()),
        ColumnKind::Date => Some(ISO_DATE_REGEX.to_string()),
        ColumnKind::Text => None,
    };

    ColumnProfile {
        total_values: total,
        non_empty_values: non_empty_count,
        non_empty_percentage: percentage(non_empty_count, total),
        unique_values: unique_count,
        unique_values_percentage: percentage(unique_count, total),
        null_like_count,
        whitespace_only_count,
        most_common_values,
        sample_values: samples,
        length_stats,
        numeric_stats,
        date_stats,
        kind,
        regex,
        primary_key: false,
        foreign_key: false,
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(part as f64 / total as f64 * 100.0)
    }
}

fn top_value_counts(counts: &BTreeMap<&str, u64>, limit: usize) -> Vec<ValueCount> {
    let mut entries: Vec<(&str, u64)> = counts.iter().map(|(value, count)| (*value, *count)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(limit)
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect()
}

fn first_distinct(non_empty: &[&str], limit: usize) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    let mut samples = Vec::new();
    for value in non_empty {
        if seen.insert(*value) {
            samples.push(value.to_string());
            if samples.len() == limit {
                break;
            }
        }
    }
    samples
}

fn length_stats(non_empty: &[&str]) -> LengthStats {
    if non_empty.is_empty() {
        return LengthStats {
            min: 0,
            max: 0,
            average: 0.0,
        };
    }
    let lengths: Vec<u64> = non_empty
        .iter()
        .map(|value| value.chars().count() as u64)
        .collect();
    let sum: u64 = lengths.iter().sum();
    LengthStats {
        min: *lengths.iter().min().unwrap_or(&0),
        max: *lengths.iter().max().unwrap_or(&0),
        average: round2(sum as f64 / lengths.len() as f64),
    }
}

fn numeric_stats(numerics: &[f64]) -> Option<NumericStats> {
    if numerics.is_empty() {
        return None;
    }
    let mut sorted = numerics.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let sum: f64 = sorted.iter().sum();
    Some(NumericStats {
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        mean: round2(sum / sorted.len() as f64),
        median: round2(median_of_sorted(&sorted)),
    })
}

/// Even-count median is the mean of the middle pair.
pub fn median_of_sorted(sorted: &[f64]) -> f64 {
    let len = sorted.len();
    if len % 2 == 1 {
        sorted[len / 2]
    } else {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    }
}

fn date_stats(non_empty: &[&str]) -> (Option<DateStats>, bool) {
    if non_empty.is_empty() {
        return (None, false);
    }

    let sample = &non_empty[..non_empty.len().min(DATE_SAMPLE_SIZE)];
    let parsed_sample = sample
        .iter()
        .filter(|value| parse_date(value).is_some())
        .count();
    if (parsed_sample as f64) < DATE_KIND_THRESHOLD * sample.len() as f64 || parsed_sample == 0 {
        return (None, false);
    }

    let dates: Vec<chrono::NaiveDate> = non_empty
        .iter()
        .filter_map(|value| parse_date(value))
        .collect();
    if dates.is_empty() {
        return (None, false);
    }

    let min_date = dates.iter().min().copied().unwrap_or_default();
    let max_date = dates.iter().max().copied().unwrap_or_default();
    let years: std::collections::BTreeSet<i32> =
        dates.iter().map(|date| chrono::Datelike::year(date)).collect();

    (
        Some(DateStats {
            min_date: min_date.format("%Y-%m-%d").to_string(),
            max_date: max_date.format("%Y-%m-%d").to_string(),
            distinct_years: years.len() as u64,
        }),
        true,
    )
}

fn infer_kind(non_empty: u64, numeric_count: u64, is_date_column: bool) -> ColumnKind {
    if non_empty > 0 && numeric_count as f64 >= NUMERIC_KIND_THRESHOLD * non_empty as f64 {
        ColumnKind::Numeric
    } else if is_date_column {
        ColumnKind::Date
    } else {
        ColumnKind::Text
    }
}
