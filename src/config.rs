//! Planner configuration loaded from JSON
//!
//! Every key is optional; missing keys take the defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, MAX_TERM_YEARS};
use crate::profile::forest::ForestParams;
use crate::retirement::TaxRegime;

/// Environment variable overriding `classifier.model_path`
pub const MODEL_PATH_ENV: &str = "RETIREMENT_PLANNER_MODEL";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub retirement: RetirementDefaults,
}

/// Classifier training and persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Artifact location (default: investor_profile_model.json)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Seed for data synthesis and forest fitting (default: 42)
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Synthetic training rows (default: 5000)
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Trees in the ensemble (default: 100)
    #[serde(default = "default_trees")]
    pub trees: usize,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
}

/// Defaults applied by the `retire` command when flags are omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementDefaults {
    /// Tax on the gain (default: 29.5%, foreign-source regime)
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    /// Share of net capital converted into a pension (default: 100%)
    #[serde(default = "default_payout_factor")]
    pub payout_factor: f64,

    /// Annual return during the payout phase (default: 5%)
    #[serde(default = "default_withdrawal_rate")]
    pub withdrawal_rate: f64,

    #[serde(default = "default_pension_years")]
    pub pension_years: u32,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("investor_profile_model.json")
}
fn default_seed() -> u64 {
    42
}
fn default_samples() -> usize {
    5_000
}
fn default_trees() -> usize {
    100
}
fn default_max_depth() -> usize {
    8
}
fn default_min_samples_split() -> usize {
    2
}
fn default_tax_rate() -> f64 {
    TaxRegime::ForeignSource.rate()
}
fn default_payout_factor() -> f64 {
    1.0
}
fn default_withdrawal_rate() -> f64 {
    0.05
}
fn default_pension_years() -> u32 {
    25
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            seed: default_seed(),
            samples: default_samples(),
            trees: default_trees(),
            max_depth: default_max_depth(),
            min_samples_split: default_min_samples_split(),
        }
    }
}

impl Default for RetirementDefaults {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            payout_factor: default_payout_factor(),
            withdrawal_rate: default_withdrawal_rate(),
            pension_years: default_pension_years(),
        }
    }
}

impl ClassifierConfig {
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features: None,
            seed: self.seed,
        }
    }
}

impl PlannerConfig {
    /// Load and validate a JSON config file
    pub fn from_json_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `RETIREMENT_PLANNER_MODEL` if set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = std::env::var_os(MODEL_PATH_ENV).filter(|v| !v.is_empty()) {
            self.classifier.model_path = PathBuf::from(path);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.classifier;
        for (field, value) in [
            ("classifier.samples", c.samples),
            ("classifier.trees", c.trees),
            ("classifier.max_depth", c.max_depth),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid { field, reason: "must be at least 1".to_string() });
            }
        }
        if c.model_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "classifier.model_path",
                reason: "must not be empty".to_string(),
            });
        }

        let r = &self.retirement;
        for (field, value) in [
            ("retirement.tax_rate", r.tax_rate),
            ("retirement.payout_factor", r.payout_factor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid { field, reason: format!("{} is outside [0, 1]", value) });
            }
        }
        if !(r.withdrawal_rate >= 0.0 && r.withdrawal_rate.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "retirement.withdrawal_rate",
                reason: format!("{} is not a non-negative rate", r.withdrawal_rate),
            });
        }
        if !(1..=MAX_TERM_YEARS).contains(&r.pension_years) {
            return Err(ConfigError::Invalid {
                field: "retirement.pension_years",
                reason: format!("must be between 1 and {}", MAX_TERM_YEARS),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.classifier.model_path, PathBuf::from("investor_profile_model.json"));
        assert_eq!(config.classifier.samples, 5_000);
        assert_eq!(config.classifier.forest_params(), ForestParams::default());
        assert_eq!(config.retirement.tax_rate, 0.295);
        assert_eq!(config.retirement.pension_years, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"classifier": {{"trees": 10}}, "retirement": {{"tax_rate": 0.05}}}}"#).unwrap();

        let config = PlannerConfig::from_json_path(file.path()).unwrap();
        assert_eq!(config.classifier.trees, 10);
        assert_eq!(config.classifier.seed, 42);
        assert_eq!(config.retirement.tax_rate, 0.05);
        assert_eq!(config.retirement.withdrawal_rate, 0.05);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = PlannerConfig::default();
        config.classifier.trees = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "classifier.trees", .. })
        ));

        let mut config = PlannerConfig::default();
        config.retirement.payout_factor = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "retirement.payout_factor", .. })
        ));

        let mut config = PlannerConfig::default();
        config.retirement.pension_years = MAX_TERM_YEARS + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "retirement.pension_years", .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"retirement": {{"pension_years": 0}}}}"#).unwrap();
        assert!(matches!(
            PlannerConfig::from_json_path(file.path()),
            Err(ConfigError::Invalid { field: "retirement.pension_years", .. })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(PlannerConfig::from_json_path(file.path()), Err(ConfigError::Parse(_))));
    }
}
