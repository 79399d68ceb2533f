//! Bond valuation engine

mod valuation;

pub use valuation::{
    pv_stream, value_bond, BondCashFlowRecord, BondValuation, PricePosition, PAR_TOLERANCE,
};
