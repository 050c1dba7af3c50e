use chrono::{NaiveDate, NaiveDateTime};

/// Date formats accepted during profiling, healing, and scoring.
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Datetime formats accepted in addition to [`DATE_FORMATS`].
pub const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Format rule for columns inferred as numeric.
pub const NUMERIC_REGEX: &str = r"^-?[0-9]+(\.[0-9]+)?$";

/// Format rule for columns inferred as dates.
pub const ISO_DATE_REGEX: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$";

/// Whether a raw value parses as a number.
pub fn is_numeric(value: &str) -> bool {
    parse_numeric(value).is_some()
}

/// Parse a raw value as f64, tolerating surrounding whitespace.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse a raw value as a date using the supported formats.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    None
}

/// Whether a value reads as a null marker: empty, `null`, or `none`.
pub fn is_null_like(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("null") || value.eq_ignore_ascii_case("none")
}

/// Round to two decimals, the percentage policy for schema artifacts.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Decimal scale of a numeric literal (digits after the point).
pub fn decimal_scale(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if !is_numeric(trimmed) {
        return None;
    }
    Some(
        trimmed
            .split_once('.')
            .map(|(_, fraction)| fraction.len() as u32)
            .unwrap_or(0),
    )
}
