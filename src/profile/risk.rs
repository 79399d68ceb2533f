//! Ordinal risk profile labels

use std::fmt;

use serde::{Deserialize, Serialize};

/// Investor risk profile, ordered from least to most risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    /// Label encoding order; index = class id used by the model
    pub const ALL: [RiskProfile; 3] = [
        RiskProfile::Conservative,
        RiskProfile::Moderate,
        RiskProfile::Aggressive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::Aggressive => "aggressive",
        }
    }

    /// Case-insensitive lookup; `None` for unknown labels
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "conservative" => Some(RiskProfile::Conservative),
            "moderate" => Some(RiskProfile::Moderate),
            "aggressive" => Some(RiskProfile::Aggressive),
            _ => None,
        }
    }

    /// Annual return assumed for long-term wealth projections
    pub fn projection_return(&self) -> f64 {
        match self {
            RiskProfile::Conservative => 0.04,
            RiskProfile::Moderate => 0.07,
            RiskProfile::Aggressive => 0.10,
        }
    }

    /// Label for a composite suitability score in `[0, 1]`
    pub fn from_score(score: f64) -> Self {
        if score < 0.35 {
            RiskProfile::Conservative
        } else if score < 0.70 {
            RiskProfile::Moderate
        } else {
            RiskProfile::Aggressive
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
