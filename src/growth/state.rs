//! Running balance tracked across growth periods

/// State of the portfolio between periods
#[derive(Debug, Clone)]
pub struct GrowthState {
    /// Current period (1-indexed once the first period has started)
    pub period: u32,

    /// Opening balance of the current period
    pub opening_balance: f64,

    /// Closing balance of the previous period, carried at full precision
    pub closing_balance: f64,
}

impl GrowthState {
    /// Initial deposit already in the account before period 1
    pub fn from_initial(initial_amount: f64) -> Self {
        Self {
            period: 0,
            opening_balance: initial_amount,
            closing_balance: initial_amount,
        }
    }

    /// Advance to next period; opening balance comes from prior closing
    pub fn advance_period(&mut self) {
        self.period += 1;
        self.opening_balance = self.closing_balance;
    }

    /// Period 1 carries only the initial deposit
    pub fn receives_contribution(&self) -> bool {
        self.period > 1
    }
}
