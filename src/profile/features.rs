//! Investor questionnaire features

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of model features
pub const FEATURE_COUNT: usize = 11;

/// Feature names in model column order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "horizon",
    "risk_tolerance",
    "monthly_income",
    "savings_percentage",
    "experience_years",
    "net_worth",
    "education_level",
    "goal",
    "financial_knowledge",
    "debt_capacity",
];

/// Raw questionnaire answers keyed by feature name; any field may be absent
pub type FeatureInput = BTreeMap<String, f64>;

/// Complete feature vector fed to the model
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InvestorFeatureVector {
    /// Age in years
    pub age: f64,
    /// Investment horizon in years
    pub horizon: f64,
    /// Risk tolerance, 1 (lowest) to 5
    pub risk_tolerance: f64,
    /// Monthly income
    pub monthly_income: f64,
    /// Share of income saved, in percent
    pub savings_percentage: f64,
    /// Years of investing experience
    pub experience_years: f64,
    /// Current net worth
    pub net_worth: f64,
    /// Education level, 1 to 5
    pub education_level: f64,
    /// Investment goal code, 1 to 5
    pub goal: f64,
    /// Financial knowledge, 1 to 5
    pub financial_knowledge: f64,
    /// Debt capacity
    pub debt_capacity: f64,
}

impl InvestorFeatureVector {
    /// Build from raw answers; missing fields default to 0
    pub fn from_input(input: &FeatureInput) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            *slot = input.get(name).copied().unwrap_or(0.0);
        }
        Self::from_array(values)
    }

    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            age: values[0],
            horizon: values[1],
            risk_tolerance: values[2],
            monthly_income: values[3],
            savings_percentage: values[4],
            experience_years: values[5],
            net_worth: values[6],
            education_level: values[7],
            goal: values[8],
            financial_knowledge: values[9],
            debt_capacity: values[10],
        }
    }

    /// Values in model column order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age,
            self.horizon,
            self.risk_tolerance,
            self.monthly_income,
            self.savings_percentage,
            self.experience_years,
            self.net_worth,
            self.education_level,
            self.goal,
            self.financial_knowledge,
            self.debt_capacity,
        ]
    }

    /// Back to a name-keyed map with every field present
    pub fn to_input(&self) -> FeatureInput {
        FEATURE_NAMES
            .iter()
            .zip(self.to_array())
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_zero() {
        let mut input = FeatureInput::new();
        input.insert("age".to_string(), 42.0);
        input.insert("goal".to_string(), 3.0);
        input.insert("unrelated".to_string(), 9.0);

        let vector = InvestorFeatureVector::from_input(&input);
        assert_eq!(vector.age, 42.0);
        assert_eq!(vector.goal, 3.0);
        assert_eq!(vector.horizon, 0.0);
        assert_eq!(vector.debt_capacity, 0.0);
    }

    #[test]
    fn test_array_order_matches_names() {
        let values: [f64; FEATURE_COUNT] = std::array::from_fn(|i| i as f64);
        let vector = InvestorFeatureVector::from_array(values);
        assert_eq!(vector.to_array(), values);

        let input = vector.to_input();
        assert_eq!(input["savings_percentage"], 4.0);
        assert_eq!(input["debt_capacity"], 10.0);
        assert_eq!(InvestorFeatureVector::from_input(&input), vector);
    }
}
