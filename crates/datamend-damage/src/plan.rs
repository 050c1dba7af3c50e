use std::path::Path;

use jsonschema::JSONSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::DamageError;

/// Current plan contract version for damage plan documents.
pub const PLAN_VERSION: &str = "0.1";

/// Configuration for one damage run: a seed plus per-defect rates.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DamagePlan {
    /// Plan contract version expected by the engine.
    pub plan_version: String,
    /// Seed for the deterministic defect streams.
    pub seed: u64,
    pub rates: DamageRates,
}

/// Independent Bernoulli probabilities for each defect type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
pub struct DamageRates {
    /// Probability that a cell is blanked.
    #[serde(default)]
    pub missing: f64,
    /// Probability that a row is duplicated after emission.
    #[serde(default)]
    pub duplicate_row: f64,
    /// Probability that a surviving non-empty cell is corrupted.
    #[serde(default)]
    pub format_corruption: f64,
}

impl DamagePlan {
    /// A plan that changes nothing; useful as a test floor.
    pub fn noop(seed: u64) -> Self {
        Self {
            plan_version: PLAN_VERSION.to_string(),
            seed,
            rates: DamageRates::default(),
        }
    }

    /// Load a plan from a JSON or TOML file, then validate it.
    pub fn from_path(path: &Path) -> Result<Self, DamageError> {
        let contents = std::fs::read_to_string(path)?;
        let plan: DamagePlan = if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&contents)?
        } else {
            let value: serde_json::Value = serde_json::from_str(&contents)?;
            validate_plan_json(&value)?;
            serde_json::from_value(value)?
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Check version and rate ranges.
    pub fn validate(&self) -> Result<(), DamageError> {
        if self.plan_version != PLAN_VERSION {
            return Err(DamageError::InvalidPlan(format!(
                "unsupported plan_version '{}', expected '{}'",
                self.plan_version, PLAN_VERSION
            )));
        }
        for (name, rate) in [
            ("missing", self.rates.missing),
            ("duplicate_row", self.rates.duplicate_row),
            ("format_corruption", self.rates.format_corruption),
        ] {
            if !(0.0..=1.0).contains(&rate) || !rate.is_finite() {
                return Err(DamageError::InvalidPlan(format!(
                    "rate '{name}' must be within [0, 1], got {rate}"
                )));
            }
        }
        Ok(())
    }

    /// SHA-256 fingerprint of the canonical plan serialization.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&canonical);
        format!("{digest:x}")
    }
}

/// Validate a plan JSON document against the generated JSON Schema.
pub fn validate_plan_json(plan_json: &serde_json::Value) -> Result<(), DamageError> {
    let schema = serde_json::to_value(schemars::schema_for!(DamagePlan))
        .map_err(|err| DamageError::InvalidPlan(err.to_string()))?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| DamageError::InvalidPlan(err.to_string()))?;

    if let Err(errors) = compiled.validate(plan_json) {
        let messages: Vec<String> = errors.map(|error| error.to_string()).collect();
        return Err(DamageError::InvalidPlan(messages.join("; ")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_plan_validates() {
        DamagePlan::noop(7).validate().expect("noop plan is valid");
    }

    #[test]
    fn out_of_range_rate_is_rejected() {
        let mut plan = DamagePlan::noop(7);
        plan.rates.missing = 1.5;
        assert!(plan.validate().is_err());

        plan.rates.missing = -0.1;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut plan = DamagePlan::noop(7);
        plan.plan_version = "9.9".to_string();
        assert!(plan.validate().is_err());
    }

    #[test]
    fn json_document_must_match_schema() {
        let good = serde_json::json!({
            "plan_version": "0.1",
            "seed": 42,
            "rates": {"missing": 0.05}
        });
        validate_plan_json(&good).expect("valid document");

        let bad = serde_json::json!({"seed": "not a number"});
        assert!(validate_plan_json(&bad).is_err());
    }

    #[test]
    fn fingerprint_tracks_content() {
        let base = DamagePlan::noop(7);
        let mut changed = DamagePlan::noop(7);
        changed.rates.missing = 0.05;

        assert_eq!(base.fingerprint(), DamagePlan::noop(7).fingerprint());
        assert_ne!(base.fingerprint(), changed.fingerprint());
    }
}
