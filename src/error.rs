//! Error types for the financial engines

use thiserror::Error;

/// Validation failures raised by the rate, growth, retirement and bond engines.
///
/// Every variant is raised before any computation starts, so a caller never
/// sees a partially built schedule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FinanceError {
    /// Negative (or non-finite) monetary input
    #[error("invalid amount for {field}: {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    /// Negative, non-finite or out-of-bounds rate
    #[error("invalid rate for {field}: {value}")]
    InvalidRate { field: &'static str, value: f64 },

    /// Frequency label that does not name one of the supported frequencies
    #[error("unrecognised frequency: {0:?}")]
    InvalidFrequency(String),

    /// Zero or longer than [`MAX_TERM_YEARS`]
    #[error("invalid term for {field}: {value}")]
    InvalidTerm { field: &'static str, value: u32 },
}

/// Longest term, in years, accepted by any engine
pub const MAX_TERM_YEARS: u32 = 100;

/// Result alias used across the financial engines
pub type Result<T> = std::result::Result<T, FinanceError>;

/// Failures inside the investor-profile pipeline.
///
/// These never reach a `predict` caller; they are turned into a fallback
/// outcome. They do surface from training and artifact persistence.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("model artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("model artifact could not be (de)serialised: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Artifact parsed but its parts do not fit together
    #[error("inconsistent model artifact: {0}")]
    InconsistentArtifact(String),

    #[error("feature {feature} is not a finite number: {value}")]
    NonFiniteFeature { feature: &'static str, value: f64 },

    #[error("feature {feature} is outside its domain: {value}")]
    FeatureOutOfRange { feature: &'static str, value: f64 },

    /// Invalid sampling distribution parameters
    #[error("training data synthesis failed: {0}")]
    Sampling(String),

    #[error("training set is empty")]
    EmptyTrainingSet,
}

/// Failures loading or validating a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Reject negative and NaN amounts
pub(crate) fn check_amount(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(FinanceError::InvalidAmount { field, value })
    }
}

/// Reject rates outside `[0, max]` (NaN included)
pub(crate) fn check_rate(field: &'static str, value: f64, max: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 && value <= max {
        Ok(value)
    } else {
        Err(FinanceError::InvalidRate { field, value })
    }
}

/// Reject zero-length and implausibly long terms
pub(crate) fn check_term(field: &'static str, value: u32) -> Result<u32> {
    if (1..=MAX_TERM_YEARS).contains(&value) {
        Ok(value)
    } else {
        Err(FinanceError::InvalidTerm { field, value })
    }
}
