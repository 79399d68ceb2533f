//! Annual effective rate <-> periodic effective rate
//!
//! Conversion is geometric: the periodic rate compounded `n` times per year
//! reproduces the annual effective rate exactly. Dividing by `n` would give a
//! nominal rate instead, which is only used for bond coupons.

use super::RateFrequency;
use crate::error::{FinanceError, Result};

/// Convert an annual effective rate into the effective rate of one period
///
/// # Arguments
/// * `annual_rate` - Annual effective rate as a decimal (0.08 for 8%)
/// * `frequency` - Target compounding frequency
///
/// # Returns
/// * `(1 + annual_rate)^(1/n) - 1`, or `InvalidRate` for negative/NaN input
pub fn convert_annual_to_periodic(annual_rate: f64, frequency: RateFrequency) -> Result<f64> {
    if !annual_rate.is_finite() || annual_rate < 0.0 {
        return Err(FinanceError::InvalidRate { field: "annual_rate", value: annual_rate });
    }

    let n = frequency.periods_per_year() as f64;
    Ok((1.0 + annual_rate).powf(1.0 / n) - 1.0)
}

/// Inverse of [`convert_annual_to_periodic`]
pub fn convert_periodic_to_annual(periodic_rate: f64, frequency: RateFrequency) -> f64 {
    (1.0 + periodic_rate).powi(frequency.periods_per_year() as i32) - 1.0
}

/// Monthly effective rate for an annual effective rate
pub fn monthly_rate(annual_rate: f64) -> Result<f64> {
    convert_annual_to_periodic(annual_rate, RateFrequency::Monthly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_rate_is_zero_for_every_frequency() {
        for freq in RateFrequency::ALL {
            assert_eq!(convert_annual_to_periodic(0.0, freq).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_round_trip_reproduces_annual_rate() {
        for &rate in &[0.001, 0.035, 0.08, 0.12, 0.5, 1.0] {
            for freq in RateFrequency::ALL {
                let periodic = convert_annual_to_periodic(rate, freq).unwrap();
                let compounded = (1.0 + periodic).powi(freq.periods_per_year() as i32);
                assert_abs_diff_eq!(compounded, 1.0 + rate, epsilon = 1e-9);
                assert_abs_diff_eq!(convert_periodic_to_annual(periodic, freq), rate, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_geometric_not_simple_division() {
        let periodic = monthly_rate(0.12).unwrap();
        // 1.12^(1/12) - 1 ~ 0.9489% per month, below the nominal 1%
        assert!(periodic < 0.01);
        assert_abs_diff_eq!(periodic, 0.009488793, epsilon = 1e-8);
    }

    #[test]
    fn test_annual_frequency_is_identity() {
        assert_abs_diff_eq!(
            convert_annual_to_periodic(0.07, RateFrequency::Annual).unwrap(),
            0.07,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = convert_annual_to_periodic(-0.01, RateFrequency::Quarterly).unwrap_err();
        assert!(matches!(err, FinanceError::InvalidRate { .. }));
    }
}
