//! Discounted cash-flow valuation of fixed-coupon bonds
//!
//! The coupon rate is nominal: it is split evenly across payment periods.
//! The market rate is an annual effective rate and is converted
//! geometrically to the payment frequency before discounting.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{check_amount, check_term, FinanceError, Result};
use crate::rates::{convert_annual_to_periodic, RateFrequency};

/// Tolerance under which a price counts as par (half a cent)
pub const PAR_TOLERANCE: f64 = 0.005;

/// One coupon period of the bond schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondCashFlowRecord {
    /// Payment period (1-indexed)
    pub period: u32,

    /// Coupon paid, plus face value in the final period
    pub cash_flow: f64,

    /// Cash flow discounted to today
    pub present_value: f64,
}

/// Position of the bond price relative to its face value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricePosition {
    /// Present value above face value
    Premium,
    /// Present value below face value
    Discount,
    /// Present value equal to face value
    Par,
}

/// Result of a bond valuation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondValuation {
    /// Face (nominal) value repaid at maturity
    pub face_value: f64,

    /// Coupon paid every period
    pub coupon_amount: f64,

    /// Nominal coupon rate per period
    pub periodic_coupon_rate: f64,

    /// Effective discount rate per period
    pub periodic_discount_rate: f64,

    /// Sum of discounted cash flows
    pub present_value: f64,

    /// Cash-flow schedule, one row per period
    pub cash_flows: Vec<BondCashFlowRecord>,
}

impl BondValuation {
    /// Compare the present value with face value
    pub fn price_position(&self) -> PricePosition {
        let diff = self.present_value - self.face_value;
        if diff.abs() < PAR_TOLERANCE {
            PricePosition::Par
        } else if diff > 0.0 {
            PricePosition::Premium
        } else {
            PricePosition::Discount
        }
    }

    /// Undiscounted total of every payment
    pub fn total_cash_flow(&self) -> f64 {
        self.cash_flows.iter().map(|r| r.cash_flow).sum()
    }
}

/// Present value of a stream of `(period, amount)` pairs at a periodic rate
pub fn pv_stream(flows: &[(u32, f64)], periodic_rate: f64) -> f64 {
    flows
        .iter()
        .map(|(period, amount)| amount * discount_factor(periodic_rate, *period))
        .sum()
}

fn discount_factor(periodic_rate: f64, period: u32) -> f64 {
    match i32::try_from(period) {
        Ok(n) => (1.0 + periodic_rate).powi(-n),
        Err(_) => (1.0 + periodic_rate).powf(-f64::from(period)),
    }
}

/// Value a fixed-coupon bond
///
/// # Arguments
/// * `face_value` - Nominal value repaid at maturity (>= 0)
/// * `annual_coupon_rate` - Nominal annual coupon rate (>= 0)
/// * `payment_frequency` - Coupon frequency
/// * `term_years` - Years to maturity (>= 1)
/// * `annual_market_rate` - Annual effective required return (>= 0)
pub fn value_bond(
    face_value: f64,
    annual_coupon_rate: f64,
    payment_frequency: RateFrequency,
    term_years: u32,
    annual_market_rate: f64,
) -> Result<BondValuation> {
    check_amount("face_value", face_value)?;
    if !annual_coupon_rate.is_finite() || annual_coupon_rate < 0.0 {
        return Err(FinanceError::InvalidRate { field: "annual_coupon_rate", value: annual_coupon_rate });
    }
    check_term("term_years", term_years)?;

    let n_per_year = payment_frequency.periods_per_year();
    let n_total = term_years * n_per_year;

    let periodic_coupon_rate = annual_coupon_rate / n_per_year as f64;
    let periodic_discount_rate = convert_annual_to_periodic(annual_market_rate, payment_frequency)?;
    let coupon_amount = face_value * periodic_coupon_rate;

    debug!(
        "valuing bond: {} periods, coupon {:.4}, discount rate {:.8}",
        n_total, coupon_amount, periodic_discount_rate
    );

    let cash_flows: Vec<BondCashFlowRecord> = (1..=n_total)
        .map(|period| {
            let cash_flow = if period == n_total {
                coupon_amount + face_value
            } else {
                coupon_amount
            };
            BondCashFlowRecord {
                period,
                cash_flow,
                present_value: cash_flow * discount_factor(periodic_discount_rate, period),
            }
        })
        .collect();

    let present_value = cash_flows.iter().map(|r| r.present_value).sum();

    Ok(BondValuation {
        face_value,
        coupon_amount,
        periodic_coupon_rate,
        periodic_discount_rate,
        present_value,
        cash_flows,
    })
}
