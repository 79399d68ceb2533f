//! Monthly pension from net capital (level annuity payment)

use crate::error::{check_rate, check_term, FinanceError, Result};
use crate::rates::monthly_rate;

/// Level payment that fully amortises `present_value` over `n_periods`
///
/// Payments at the end of each period; zero rate degenerates to straight-line
/// depletion.
pub fn annuity_payment(present_value: f64, n_periods: u32, periodic_rate: f64) -> f64 {
    if n_periods == 0 {
        return 0.0;
    }
    if periodic_rate == 0.0 {
        return present_value / n_periods as f64;
    }

    let v_n = match i32::try_from(n_periods) {
        Ok(n) => (1.0 + periodic_rate).powi(-n),
        Err(_) => (1.0 + periodic_rate).powf(-f64::from(n_periods)),
    };
    present_value * periodic_rate / (1.0 - v_n)
}

/// Compute the monthly pension drawn from `net_capital`
///
/// # Arguments
/// * `net_capital` - Capital after tax; non-positive capital pays nothing
/// * `annual_withdrawal_rate` - Annual effective return during retirement
/// * `pension_years` - Years of payments (>= 1)
/// * `payout_factor` - Fraction of the computed payment actually drawn, in `[0, 1]`
pub fn compute_monthly_pension(
    net_capital: f64,
    annual_withdrawal_rate: f64,
    pension_years: u32,
    payout_factor: f64,
) -> Result<f64> {
    if !net_capital.is_finite() {
        return Err(FinanceError::InvalidAmount { field: "net_capital", value: net_capital });
    }
    check_term("pension_years", pension_years)?;
    check_rate("payout_factor", payout_factor, 1.0)?;
    let rate = monthly_rate(annual_withdrawal_rate)?;

    if net_capital <= 0.0 {
        return Ok(0.0);
    }

    let n_months = pension_years * 12;
    Ok(annuity_payment(net_capital, n_months, rate) * payout_factor)
}
