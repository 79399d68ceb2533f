//! Portfolio growth engine for period-by-period compound growth

mod state;
mod engine;
mod records;

pub use state::GrowthState;
pub use engine::{simulate_growth, GrowthEngine, GrowthPlan, MAX_ANNUAL_RATE};
pub use records::{round_cents, GrowthPeriodRecord, GrowthResult, GrowthSummary};
