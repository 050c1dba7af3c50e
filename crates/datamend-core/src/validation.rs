use crate::error::{Error, Result};
use crate::schema::TableSchema;

/// Validate internal consistency of a built table schema.
///
/// This checks:
/// - column totals agree with the table record count
/// - derived counts never exceed their totals
/// - percentages stay within [0, 100]
/// - the declared primary key names an existing column
pub fn validate_table_schema(schema: &TableSchema) -> Result<()> {
    if let Some(primary_key) = &schema.primary_key {
        if !schema
            .columns
            .keys()
            .any(|name| name.eq_ignore_ascii_case(primary_key))
        {
            return Err(Error::InvalidSchema(format!(
                "primary key column not found: {}.{}",
                schema.table_name, primary_key
            )));
        }
    }

    for (name, profile) in &schema.columns {
        if profile.total_values != schema.record_count {
            return Err(Error::InvalidSchema(format!(
                "column total mismatch: {}.{} has {} values for {} records",
                schema.table_name, name, profile.total_values, schema.record_count
            )));
        }
        if profile.non_empty_values > profile.total_values {
            return Err(Error::InvalidSchema(format!(
                "non-empty count exceeds total: {}.{}",
                schema.table_name, name
            )));
        }
        if profile.unique_values > profile.total_values {
            return Err(Error::InvalidSchema(format!(
                "unique count exceeds total: {}.{}",
                schema.table_name, name
            )));
        }
        for percentage in [profile.non_empty_percentage, profile.unique_values_percentage] {
            if !(0.0..=100.0).contains(&percentage) {
                return Err(Error::InvalidSchema(format!(
                    "percentage out of range: {}.{}",
                    schema.table_name, name
                )));
            }
        }
        for entry in &profile.most_common_values {
            if entry.count > profile.total_values {
                return Err(Error::InvalidSchema(format!(
                    "most common count exceeds total: {}.{}",
                    schema.table_name, name
                )));
            }
        }
    }

    Ok(())
}
