//! Retirement engine: capital-gains tax, monthly pension and scenario comparison
//!
//! Accumulated capital can be taken either as a lump sum (the net capital after
//! tax) or converted into a level monthly pension over a fixed number of years.

mod tax;
mod pension;
mod scenarios;

pub use tax::{compute_tax, TaxRegime, TaxResult};
pub use pension::{annuity_payment, compute_monthly_pension};
pub use scenarios::{compute_scenarios, compute_scenarios_with_factor, PensionScenario};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::growth::GrowthResult;

/// Lump-sum and pension options for one accumulated portfolio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementPlan {
    /// Final capital minus total contributed (may be negative)
    pub gain: f64,

    /// Capital-gains tax due
    pub tax: f64,

    /// Capital after tax, i.e. the lump-sum option
    pub net_capital: f64,

    /// Monthly pension option
    pub monthly_pension: f64,
}

/// Tax the accumulated gain and convert the remainder into a pension
pub fn plan_retirement(
    growth: &GrowthResult,
    tax_rate: f64,
    annual_withdrawal_rate: f64,
    pension_years: u32,
    payout_factor: f64,
) -> Result<RetirementPlan> {
    let taxed = compute_tax(growth.final_capital, growth.total_contributed, tax_rate)?;
    let monthly_pension =
        compute_monthly_pension(taxed.net_capital, annual_withdrawal_rate, pension_years, payout_factor)?;

    Ok(RetirementPlan {
        gain: growth.final_capital - growth.total_contributed,
        tax: taxed.tax,
        net_capital: taxed.net_capital,
        monthly_pension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::simulate_growth;
    use crate::rates::RateFrequency;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_plan_from_growth() {
        let growth = simulate_growth(10_000.0, 500.0, RateFrequency::Monthly, 0.08, 35).unwrap();
        let plan = plan_retirement(&growth, 0.295, 0.05, 25, 1.0).unwrap();

        assert!(plan.gain > 0.0);
        assert_abs_diff_eq!(plan.tax, plan.gain * 0.295, epsilon = 1e-6);
        assert_abs_diff_eq!(plan.net_capital, growth.final_capital - plan.tax, epsilon = 1e-6);
        assert_eq!(
            plan.monthly_pension,
            compute_monthly_pension(plan.net_capital, 0.05, 25, 1.0).unwrap()
        );
    }

    #[test]
    fn test_plan_without_gain() {
        let growth = simulate_growth(10_000.0, 0.0, RateFrequency::Annual, 0.0, 5).unwrap();
        let plan = plan_retirement(&growth, 0.05, 0.0, 10, 1.0).unwrap();

        assert_eq!(plan.gain, 0.0);
        assert_eq!(plan.tax, 0.0);
        assert_eq!(plan.net_capital, 10_000.0);
        assert_abs_diff_eq!(plan.monthly_pension, 10_000.0 / 120.0, epsilon = 1e-12);
    }
}
