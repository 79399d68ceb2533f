//! Growth schedule output structures

use serde::{Deserialize, Serialize};

/// Round a monetary amount to cents for display
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A single row of the growth schedule for one compounding period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPeriodRecord {
    /// Period index (1-indexed, no gaps)
    pub period: u32,

    /// Balance at the start of the period
    pub opening_balance: f64,

    /// Contribution deposited during the period (zero in period 1)
    pub contribution: f64,

    /// Interest accrued on the opening balance
    pub interest: f64,

    /// opening_balance + contribution + interest
    pub closing_balance: f64,
}

impl GrowthPeriodRecord {
    /// Copy with every monetary field rounded to cents.
    ///
    /// Only for display and export; the engine never feeds rounded values
    /// back into the running balance.
    pub fn rounded(&self) -> Self {
        Self {
            period: self.period,
            opening_balance: round_cents(self.opening_balance),
            contribution: round_cents(self.contribution),
            interest: round_cents(self.interest),
            closing_balance: round_cents(self.closing_balance),
        }
    }
}

/// Complete growth simulation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthResult {
    /// Period rows in order
    pub records: Vec<GrowthPeriodRecord>,

    /// Closing balance of the last period
    pub final_capital: f64,

    /// Initial amount plus all periodic contributions
    pub total_contributed: f64,
}

impl GrowthResult {
    pub(crate) fn new(initial_amount: f64, expected_periods: usize) -> Self {
        Self {
            records: Vec::with_capacity(expected_periods),
            final_capital: initial_amount,
            total_contributed: initial_amount,
        }
    }

    pub(crate) fn add_row(&mut self, row: GrowthPeriodRecord) {
        self.final_capital = row.closing_balance;
        self.total_contributed += row.contribution;
        self.records.push(row);
    }

    /// Interest earned over the whole term
    pub fn total_interest(&self) -> f64 {
        self.records.iter().map(|r| r.interest).sum()
    }

    /// Running total of money deposited at the end of each period,
    /// initial amount included
    pub fn cumulative_contributions(&self) -> Vec<f64> {
        let initial = self.total_contributed - self.records.iter().map(|r| r.contribution).sum::<f64>();
        self.records
            .iter()
            .scan(initial, |acc, r| {
                *acc += r.contribution;
                Some(*acc)
            })
            .collect()
    }

    /// Rows rounded to cents for display/export
    pub fn rounded_records(&self) -> Vec<GrowthPeriodRecord> {
        self.records.iter().map(GrowthPeriodRecord::rounded).collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> GrowthSummary {
        GrowthSummary {
            total_periods: self.records.len() as u32,
            final_capital: self.final_capital,
            total_contributed: self.total_contributed,
            total_interest: self.total_interest(),
            gain: self.final_capital - self.total_contributed,
        }
    }
}

/// Summary statistics for a growth simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthSummary {
    pub total_periods: u32,
    pub final_capital: f64,
    pub total_contributed: f64,
    pub total_interest: f64,
    pub gain: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(period: u32, opening: f64, contribution: f64, interest: f64) -> GrowthPeriodRecord {
        GrowthPeriodRecord {
            period,
            opening_balance: opening,
            contribution,
            interest,
            closing_balance: opening + contribution + interest,
        }
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(10.005_1), 10.01);
        assert_eq!(round_cents(1234.5649), 1234.56);
    }

    #[test]
    fn test_result_tracks_final_capital_and_contributions() {
        let mut result = GrowthResult::new(100.0, 2);
        result.add_row(row(1, 100.0, 0.0, 1.0));
        result.add_row(row(2, 101.0, 50.0, 1.01));

        assert!((result.final_capital - 152.01).abs() < 1e-9);
        assert_eq!(result.total_contributed, 150.0);
        assert_eq!(result.cumulative_contributions(), vec![100.0, 150.0]);

        let summary = result.summary();
        assert_eq!(summary.total_periods, 2);
        assert!((summary.total_interest - 2.01).abs() < 1e-12);
        assert!((summary.gain - 2.01).abs() < 1e-9);
    }

    #[test]
    fn test_rounded_view_leaves_source_untouched() {
        let mut result = GrowthResult::new(100.0, 1);
        result.add_row(row(1, 100.0, 0.0, 0.123_456));

        let rounded = result.rounded_records();
        assert_eq!(rounded[0].interest, 0.12);
        assert_eq!(result.records[0].interest, 0.123_456);
    }
}
