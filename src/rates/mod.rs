//! Compounding frequencies and effective-rate conversion

mod frequency;
mod conversion;

pub use frequency::RateFrequency;
pub use conversion::{convert_annual_to_periodic, convert_periodic_to_annual, monthly_rate};
