//! Supported compounding / payment frequencies

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FinanceError;

/// Number of compounding or payment periods in a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateFrequency {
    /// 12 periods per year
    Monthly,
    /// 6 periods per year
    Bimonthly,
    /// 4 periods per year
    Quarterly,
    /// 3 periods per year
    FourMonthly,
    /// 2 periods per year
    Semiannual,
    /// 1 period per year
    Annual,
}

impl RateFrequency {
    /// All frequencies, most frequent first
    pub const ALL: [RateFrequency; 6] = [
        RateFrequency::Monthly,
        RateFrequency::Bimonthly,
        RateFrequency::Quarterly,
        RateFrequency::FourMonthly,
        RateFrequency::Semiannual,
        RateFrequency::Annual,
    ];

    pub fn periods_per_year(&self) -> u32 {
        match self {
            RateFrequency::Monthly => 12,
            RateFrequency::Bimonthly => 6,
            RateFrequency::Quarterly => 4,
            RateFrequency::FourMonthly => 3,
            RateFrequency::Semiannual => 2,
            RateFrequency::Annual => 1,
        }
    }

    /// Canonical label, as accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            RateFrequency::Monthly => "monthly",
            RateFrequency::Bimonthly => "bimonthly",
            RateFrequency::Quarterly => "quarterly",
            RateFrequency::FourMonthly => "four-monthly",
            RateFrequency::Semiannual => "semiannual",
            RateFrequency::Annual => "annual",
        }
    }
}

impl fmt::Display for RateFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateFrequency {
    type Err = FinanceError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let normalised = label.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalised.as_str() {
            "monthly" => Ok(RateFrequency::Monthly),
            "bimonthly" | "bi-monthly" => Ok(RateFrequency::Bimonthly),
            "quarterly" => Ok(RateFrequency::Quarterly),
            "four-monthly" | "fourmonthly" => Ok(RateFrequency::FourMonthly),
            "semiannual" | "semi-annual" => Ok(RateFrequency::Semiannual),
            "annual" | "yearly" => Ok(RateFrequency::Annual),
            _ => Err(FinanceError::InvalidFrequency(label.to_string())),
        }
    }
}
