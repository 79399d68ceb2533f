//! Pension comparison across withdrawal-rate / duration combinations

use serde::{Deserialize, Serialize};

use super::pension::compute_monthly_pension;
use crate::error::Result;

/// One row of the scenario comparison table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PensionScenario {
    /// Annual effective return during retirement
    pub annual_withdrawal_rate: f64,

    /// Years of payments
    pub pension_years: u32,

    /// Resulting monthly pension
    pub monthly_pension: f64,
}

/// Cross product of every rate with every horizon, full payout
///
/// Rates form the outer loop, horizons the inner one. Duplicate pairs are kept.
pub fn compute_scenarios(net_capital: f64, rates: &[f64], horizons: &[u32]) -> Result<Vec<PensionScenario>> {
    compute_scenarios_with_factor(net_capital, rates, horizons, 1.0)
}

/// Same as [`compute_scenarios`] with an explicit payout factor
pub fn compute_scenarios_with_factor(
    net_capital: f64,
    rates: &[f64],
    horizons: &[u32],
    payout_factor: f64,
) -> Result<Vec<PensionScenario>> {
    let mut table = Vec::with_capacity(rates.len() * horizons.len());

    for &annual_withdrawal_rate in rates {
        for &pension_years in horizons {
            let monthly_pension =
                compute_monthly_pension(net_capital, annual_withdrawal_rate, pension_years, payout_factor)?;
            table.push(PensionScenario {
                annual_withdrawal_rate,
                pension_years,
                monthly_pension,
            });
        }
    }

    Ok(table)
}
