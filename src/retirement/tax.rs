//! Capital-gains tax on accumulated growth

use serde::{Deserialize, Serialize};

use crate::error::{check_amount, check_rate, Result};

/// Preset tax regimes for capital gains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaxRegime {
    /// Gains from foreign-source investments (29.5%)
    ForeignSource,
    /// Gains realised on the local stock exchange (5%)
    LocalExchange,
}

impl TaxRegime {
    pub fn rate(&self) -> f64 {
        match self {
            TaxRegime::ForeignSource => 0.295,
            TaxRegime::LocalExchange => 0.05,
        }
    }
}

/// Tax payable on the gain and capital left afterwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Tax due (zero when there is no gain)
    pub tax: f64,

    /// Capital after tax
    pub net_capital: f64,
}

/// Compute capital-gains tax
///
/// Gain is `final_capital - total_contributed`. A non-positive gain pays no
/// tax and the net capital equals the final capital exactly.
pub fn compute_tax(final_capital: f64, total_contributed: f64, tax_rate: f64) -> Result<TaxResult> {
    check_amount("final_capital", final_capital)?;
    check_amount("total_contributed", total_contributed)?;
    check_rate("tax_rate", tax_rate, 1.0)?;

    let gain = final_capital - total_contributed;
    if gain <= 0.0 {
        return Ok(TaxResult { tax: 0.0, net_capital: final_capital });
    }

    let tax = gain * tax_rate;
    Ok(TaxResult { tax, net_capital: final_capital - tax })
}
