//! Retirement Planner - financial engine and investor profiling
//!
//! This library provides:
//! - Annual to periodic rate conversion across payment frequencies
//! - Period-by-period portfolio growth with regular contributions
//! - Capital-gains tax, monthly pension and pension scenario tables
//! - Discounted cash-flow bond valuation
//! - Investor risk-profile classification with wealth projections

pub mod error;
pub mod rates;
pub mod growth;
pub mod retirement;
pub mod bonds;
pub mod profile;
pub mod config;
pub mod export;

// Re-export commonly used types
pub use error::{ConfigError, FinanceError, ProfileError};
pub use rates::{convert_annual_to_periodic, RateFrequency};
pub use growth::{simulate_growth, GrowthEngine, GrowthPlan, GrowthResult};
pub use retirement::{compute_monthly_pension, compute_scenarios, compute_tax, plan_retirement, RetirementPlan, TaxRegime};
pub use bonds::{value_bond, BondValuation, PricePosition};
pub use profile::{project, ProfileClassifier, ProfileOutcome, ProfileResult, RiskProfile};
pub use config::PlannerConfig;
