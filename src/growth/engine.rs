//! Core growth engine for period-by-period compound growth
//!
//! Accrual policy: the initial amount is on deposit before period 1, period 1
//! receives no contribution, and interest accrues on the opening balance only.
//! Contributions made during a period start earning in the next one.

use log::debug;
use serde::{Deserialize, Serialize};

use super::records::{GrowthPeriodRecord, GrowthResult};
use super::state::GrowthState;
use crate::error::{check_amount, check_rate, check_term, Result};
use crate::rates::{convert_annual_to_periodic, RateFrequency};

/// Highest annual effective rate accepted by the growth engine
pub const MAX_ANNUAL_RATE: f64 = 0.5;

/// Inputs for a growth simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthPlan {
    /// Amount on deposit before the first period
    pub initial_amount: f64,

    /// Contribution deposited every period from period 2 onwards
    pub periodic_contribution: f64,

    /// Contribution and compounding frequency
    pub frequency: RateFrequency,

    /// Annual effective rate (decimal)
    pub annual_rate: f64,

    /// Term in whole years
    pub term_years: u32,
}

impl GrowthPlan {
    /// Validate every input before any period is computed
    pub fn validate(&self) -> Result<()> {
        check_amount("initial_amount", self.initial_amount)?;
        check_amount("periodic_contribution", self.periodic_contribution)?;
        check_rate("annual_rate", self.annual_rate, MAX_ANNUAL_RATE)?;
        check_term("term_years", self.term_years)?;
        Ok(())
    }

    pub fn total_periods(&self) -> u32 {
        self.term_years.saturating_mul(self.frequency.periods_per_year())
    }
}

/// Growth engine bound to a validated plan
#[derive(Debug, Clone)]
pub struct GrowthEngine {
    plan: GrowthPlan,
    periodic_rate: f64,
}

impl GrowthEngine {
    /// Create a new engine; fails fast on invalid inputs
    pub fn new(plan: GrowthPlan) -> Result<Self> {
        plan.validate()?;
        let periodic_rate = convert_annual_to_periodic(plan.annual_rate, plan.frequency)?;
        Ok(Self { plan, periodic_rate })
    }

    /// Effective rate applied each period
    pub fn periodic_rate(&self) -> f64 {
        self.periodic_rate
    }

    pub fn plan(&self) -> &GrowthPlan {
        &self.plan
    }

    /// Run the full schedule
    pub fn run(&self) -> GrowthResult {
        let total_periods = self.plan.total_periods();
        debug!(
            "simulating growth: {} periods at periodic rate {:.8}",
            total_periods, self.periodic_rate
        );

        let mut result = GrowthResult::new(self.plan.initial_amount, total_periods as usize);
        let mut state = GrowthState::from_initial(self.plan.initial_amount);

        for _period in 1..=total_periods {
            state.advance_period();
            let row = self.calculate_period(&mut state);
            result.add_row(row);
        }

        result
    }

    /// Calculate one period and roll the state forward
    fn calculate_period(&self, state: &mut GrowthState) -> GrowthPeriodRecord {
        let contribution = if state.receives_contribution() {
            self.plan.periodic_contribution
        } else {
            0.0
        };

        let interest = state.opening_balance * self.periodic_rate;
        let closing_balance = state.opening_balance + contribution + interest;

        state.closing_balance = closing_balance;

        GrowthPeriodRecord {
            period: state.period,
            opening_balance: state.opening_balance,
            contribution,
            interest,
            closing_balance,
        }
    }
}

/// Simulate compound growth of a portfolio
///
/// # Arguments
/// * `initial_amount` - Amount already deposited (>= 0)
/// * `periodic_contribution` - Deposit per period from period 2 (>= 0)
/// * `contribution_frequency` - Period length
/// * `annual_rate` - Annual effective rate in `[0, 0.5]`
/// * `term_years` - Term in years (>= 1)
pub fn simulate_growth(
    initial_amount: f64,
    periodic_contribution: f64,
    contribution_frequency: RateFrequency,
    annual_rate: f64,
    term_years: u32,
) -> Result<GrowthResult> {
    let plan = GrowthPlan {
        initial_amount,
        periodic_contribution,
        frequency: contribution_frequency,
        annual_rate,
        term_years,
    };
    Ok(GrowthEngine::new(plan)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FinanceError, MAX_TERM_YEARS};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_one_year_monthly_example() {
        let result = simulate_growth(10_000.0, 500.0, RateFrequency::Monthly, 0.08, 1).unwrap();

        assert_eq!(result.records.len(), 12);
        assert_abs_diff_eq!(result.total_contributed, 15_500.0, epsilon = 1e-9);
        assert!(result.final_capital > 15_500.0);
        assert_eq!(result.records[0].contribution, 0.0);
        assert!(result.records[1..].iter().all(|r| r.contribution == 500.0));
    }

    #[test]
    fn test_record_invariants() {
        let result = simulate_growth(2_500.0, 150.0, RateFrequency::Quarterly, 0.065, 5).unwrap();
        let rate = convert_annual_to_periodic(0.065, RateFrequency::Quarterly).unwrap();

        for (i, row) in result.records.iter().enumerate() {
            assert_eq!(row.period, i as u32 + 1);
            assert_abs_diff_eq!(row.interest, row.opening_balance * rate, epsilon = 1e-9);
            assert_abs_diff_eq!(
                row.closing_balance,
                row.opening_balance + row.contribution + row.interest,
                epsilon = 1e-9
            );
            if i > 0 {
                assert_eq!(row.opening_balance, result.records[i - 1].closing_balance);
            }
        }
        assert_eq!(result.final_capital, result.records.last().unwrap().closing_balance);
    }

    #[test]
    fn test_total_contributed_formula() {
        let result = simulate_growth(1_000.0, 200.0, RateFrequency::Semiannual, 0.05, 7).unwrap();
        let periods = 7 * 2;
        assert_abs_diff_eq!(
            result.total_contributed,
            1_000.0 + 200.0 * (periods as f64 - 1.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_final_capital_increases_with_rate() {
        let mut previous = 0.0;
        for &rate in &[0.0, 0.01, 0.04, 0.08, 0.2, 0.5] {
            let result = simulate_growth(5_000.0, 100.0, RateFrequency::Monthly, rate, 10).unwrap();
            assert!(result.final_capital > previous);
            previous = result.final_capital;
        }
    }

    #[test]
    fn test_zero_rate_accumulates_deposits_only() {
        let result = simulate_growth(1_000.0, 100.0, RateFrequency::Annual, 0.0, 3).unwrap();
        assert_abs_diff_eq!(result.final_capital, 1_200.0, epsilon = 1e-12);
        assert_eq!(result.total_interest(), 0.0);
    }

    #[test]
    fn test_single_annual_period() {
        let result = simulate_growth(1_000.0, 999.0, RateFrequency::Annual, 0.1, 1).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_abs_diff_eq!(result.final_capital, 1_100.0, epsilon = 1e-9);
        assert_eq!(result.total_contributed, 1_000.0);
    }

    #[test]
    fn test_long_schedule_carries_full_precision() {
        let result = simulate_growth(10_000.0, 250.0, RateFrequency::Monthly, 0.07, 30).unwrap();
        assert_eq!(result.records.len(), 360);

        // Closed form: FV of the deposit plus an ordinary annuity of 359 payments
        let r = convert_annual_to_periodic(0.07, RateFrequency::Monthly).unwrap();
        let expected = 10_000.0 * (1.0 + r).powi(360)
            + 250.0 * ((1.0 + r).powi(359) - 1.0) / r;
        assert_abs_diff_eq!(result.final_capital, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_validation_fails_fast() {
        let err = simulate_growth(-1.0, 0.0, RateFrequency::Monthly, 0.05, 1).unwrap_err();
        assert!(matches!(err, FinanceError::InvalidAmount { field: "initial_amount", .. }));

        let err = simulate_growth(0.0, -5.0, RateFrequency::Monthly, 0.05, 1).unwrap_err();
        assert!(matches!(err, FinanceError::InvalidAmount { field: "periodic_contribution", .. }));

        let err = simulate_growth(0.0, 0.0, RateFrequency::Monthly, 0.51, 1).unwrap_err();
        assert!(matches!(err, FinanceError::InvalidRate { .. }));

        let err = simulate_growth(0.0, 0.0, RateFrequency::Monthly, 0.05, 0).unwrap_err();
        assert!(matches!(err, FinanceError::InvalidTerm { .. }));
    }

    #[test]
    fn test_overlong_term_rejected() {
        let err = simulate_growth(1_000.0, 10.0, RateFrequency::Monthly, 0.05, 400_000_000).unwrap_err();
        assert!(matches!(err, FinanceError::InvalidTerm { field: "term_years", value: 400_000_000 }));

        let result = simulate_growth(1_000.0, 10.0, RateFrequency::Monthly, 0.05, MAX_TERM_YEARS).unwrap();
        assert_eq!(result.records.len(), 1_200);
    }
}
