//! Static per-profile lookup tables: return bands, allocations, descriptions
//! and recommendation text

use serde::{Deserialize, Serialize};

use super::risk::RiskProfile;

/// Suggested annual return band, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuggestedReturn {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl SuggestedReturn {
    /// Band reported when a prediction falls back
    pub const FALLBACK: SuggestedReturn = SuggestedReturn { min: 4.0, max: 9.0, mean: 6.5 };

    /// Band for labels outside the three canonical profiles
    pub const GENERIC: SuggestedReturn = SuggestedReturn { min: 3.0, max: 8.0, mean: 5.5 };

    /// Mean return as a decimal, e.g. to seed a growth simulation
    pub fn mean_rate(&self) -> f64 {
        self.mean / 100.0
    }
}

/// One asset class and its share of the portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationWeight {
    pub category: String,
    pub percentage: f64,
}

/// Asset-allocation template
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub weights: Vec<AllocationWeight>,
    pub summary: String,
}

impl AssetAllocation {
    fn from_table(table: &[(&str, f64)], summary: &str) -> Self {
        Self {
            weights: table
                .iter()
                .map(|(category, percentage)| AllocationWeight {
                    category: category.to_string(),
                    percentage: *percentage,
                })
                .collect(),
            summary: summary.to_string(),
        }
    }

    /// Sum of all percentages (100 for every template)
    pub fn total(&self) -> f64 {
        self.weights.iter().map(|w| w.percentage).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Narrative description of a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDescription {
    pub title: String,
    pub focus: String,
    pub typical_horizon: String,
    pub risk_tolerance: String,
    pub objective: String,
    pub characteristics: Vec<String>,
}

/// Titled block of advice with concrete actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationBlock {
    pub title: String,
    pub body: String,
    pub actions: Vec<String>,
}

impl RecommendationBlock {
    fn new(title: &str, body: &str, actions: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }
}

pub fn suggested_return(profile: RiskProfile) -> SuggestedReturn {
    match profile {
        RiskProfile::Conservative => SuggestedReturn { min: 2.0, max: 5.0, mean: 3.5 },
        RiskProfile::Moderate => SuggestedReturn { min: 4.0, max: 9.0, mean: 6.5 },
        RiskProfile::Aggressive => SuggestedReturn { min: 7.0, max: 15.0, mean: 11.0 },
    }
}

/// Label-keyed lookup; unknown labels get the generic band
pub fn suggested_return_for_label(label: &str) -> SuggestedReturn {
    RiskProfile::from_label(label).map_or(SuggestedReturn::GENERIC, suggested_return)
}

pub fn asset_allocation(profile: RiskProfile) -> AssetAllocation {
    match profile {
        RiskProfile::Conservative => AssetAllocation::from_table(
            &[
                ("Government bonds", 60.0),
                ("Term deposits", 20.0),
                ("Blue-chip equities", 15.0),
                ("Mutual funds", 5.0),
            ],
            "Conservative mix focused on preserving capital with low risk.",
        ),
        RiskProfile::Moderate => AssetAllocation::from_table(
            &[
                ("Corporate bonds", 40.0),
                ("Blue-chip equities", 35.0),
                ("Index funds", 15.0),
                ("Commodities", 5.0),
                ("Cash", 5.0),
            ],
            "Balanced mix of fixed income and equities for moderate growth.",
        ),
        RiskProfile::Aggressive => AssetAllocation::from_table(
            &[
                ("Growth equities", 60.0),
                ("Speculative ETFs", 20.0),
                ("Cryptocurrencies", 10.0),
                ("Startups", 5.0),
                ("Commodities", 5.0),
            ],
            "Aggressive mix aimed at maximum long-term growth with high volatility.",
        ),
    }
}

/// Label-keyed lookup; unknown labels get a generic template
pub fn asset_allocation_for_label(label: &str) -> AssetAllocation {
    match RiskProfile::from_label(label) {
        Some(profile) => asset_allocation(profile),
        None => AssetAllocation::from_table(
            &[("Bonds", 40.0), ("Equities", 40.0), ("Cash", 10.0), ("Other", 10.0)],
            "Generic mix for an unidentified profile.",
        ),
    }
}

fn description(title: &str, focus: &str, horizon: &str, tolerance: &str, objective: &str, traits: &[&str]) -> ProfileDescription {
    ProfileDescription {
        title: title.to_string(),
        focus: focus.to_string(),
        typical_horizon: horizon.to_string(),
        risk_tolerance: tolerance.to_string(),
        objective: objective.to_string(),
        characteristics: traits.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn describe(profile: RiskProfile) -> ProfileDescription {
    match profile {
        RiskProfile::Conservative => description(
            "Conservative profile",
            "Capital preservation and low risk",
            "Short to medium term (1-5 years)",
            "Low",
            "Protect capital with returns slightly above inflation",
            &[
                "Prefers stability over high returns",
                "Invests mainly in government debt instruments",
                "Low exposure to market volatility",
                "High liquidity for emergencies",
                "Minimal potential losses",
            ],
        ),
        RiskProfile::Moderate => description(
            "Moderate profile",
            "Balance between risk and return",
            "Medium to long term (5-15 years)",
            "Medium",
            "Steady capital growth with controlled risk",
            &[
                "Seeks balance between profitability and safety",
                "Portfolio diversified across fixed income and equities",
                "Tolerates some volatility in exchange for better returns",
                "Medium-term financial goals",
                "Moderate exposure to international markets",
            ],
        ),
        RiskProfile::Aggressive => description(
            "Aggressive profile",
            "Maximum capital growth",
            "Long term (15+ years)",
            "High",
            "Maximise returns while accepting higher volatility",
            &[
                "Focused on long-term growth",
                "High exposure to equities and risk assets",
                "Tolerates high volatility",
                "Ambitious financial goals",
                "Global diversification across asset classes",
            ],
        ),
    }
}

/// Label-keyed lookup; unknown labels get an "unrecognised" entry
pub fn describe_label(label: &str) -> ProfileDescription {
    match RiskProfile::from_label(label) {
        Some(profile) => describe(profile),
        None => description("Unrecognised profile", "", "", "", "", &[]),
    }
}

fn base_recommendations(profile: RiskProfile) -> Vec<RecommendationBlock> {
    match profile {
        RiskProfile::Conservative => vec![
            RecommendationBlock::new(
                "Investment strategy",
                "Focus on capital preservation with low risk",
                &[
                    "Keep at least 60% in fixed-income assets",
                    "Consider government and high-grade corporate bonds",
                    "Hold an emergency fund covering 6-12 months of expenses",
                ],
            ),
            RecommendationBlock::new(
                "Risk management",
                "Minimise exposure to market volatility",
                &[
                    "Avoid speculative investments",
                    "Diversify across different debt issuers",
                    "Consider investment insurance to protect your capital",
                ],
            ),
        ],
        RiskProfile::Moderate => vec![
            RecommendationBlock::new(
                "Investment strategy",
                "Balance between growth and stability",
                &[
                    "Keep a balanced mix of fixed income and equities",
                    "Consider index funds for diversified exposure",
                    "Review and rebalance your portfolio every 6-12 months",
                ],
            ),
            RecommendationBlock::new(
                "Long-term growth",
                "Build wealth steadily",
                &[
                    "Take advantage of compounding with regular contributions",
                    "Consider dividend reinvestment plans",
                    "Explore emerging markets for further diversification",
                ],
            ),
        ],
        RiskProfile::Aggressive => vec![
            RecommendationBlock::new(
                "Investment strategy",
                "Maximum growth with high risk tolerance",
                &[
                    "Focus on growth stocks and innovative sectors",
                    "Consider small and mid caps with high potential",
                    "Keep a small portion in alternative assets such as cryptocurrencies",
                ],
            ),
            RecommendationBlock::new(
                "Risk management",
                "Handling volatility in aggressive markets",
                &[
                    "Set stop-loss orders to limit losses",
                    "Keep a long investment horizon (10+ years)",
                    "Consider hedging strategies against market downturns",
                ],
            ),
        ],
    }
}

/// Profile advice plus age and horizon adjustments
///
/// Adds an age block below 30 or above 50 and a horizon block below 5 years.
pub fn recommendations(profile: RiskProfile, age: f64, horizon: f64) -> Vec<RecommendationBlock> {
    let mut blocks = base_recommendations(profile);

    let age_actions: &[&str] = if age < 30.0 {
        &[
            "Use time in your favour with higher-risk investments",
            "Set aside a portion for ongoing financial education",
        ]
    } else if age > 50.0 {
        &[
            "Consider gradually reducing exposure to higher-risk assets",
            "Evaluate passive income options for retirement",
        ]
    } else {
        &[]
    };
    if !age_actions.is_empty() {
        blocks.push(RecommendationBlock::new(
            "Age-based recommendations",
            "Adjustments suggested for your life stage",
            age_actions,
        ));
    }

    if horizon < 5.0 {
        blocks.push(RecommendationBlock::new(
            "Horizon considerations",
            "Recommendations for your investment horizon",
            &[
                "Focus on capital preservation and liquidity",
                "Consider short-term instruments such as certificates of deposit",
            ],
        ));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_allocations_sum_to_hundred() {
        for profile in RiskProfile::ALL {
            assert_abs_diff_eq!(asset_allocation(profile).total(), 100.0, epsilon = 0.1);
        }
        assert_abs_diff_eq!(asset_allocation_for_label("unknown").total(), 100.0, epsilon = 0.1);
    }

    #[test]
    fn test_return_bands() {
        for profile in RiskProfile::ALL {
            let band = suggested_return(profile);
            assert!(band.min <= band.mean && band.mean <= band.max);
        }
        assert_eq!(suggested_return_for_label("Aggressive").mean, 11.0);
        assert_eq!(suggested_return_for_label("daredevil"), SuggestedReturn::GENERIC);
        assert_abs_diff_eq!(suggested_return(RiskProfile::Moderate).mean_rate(), 0.065, epsilon = 1e-12);
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(describe(RiskProfile::Moderate).characteristics.len(), 5);
        assert_eq!(describe_label("?").title, "Unrecognised profile");
        assert!(describe_label("?").characteristics.is_empty());
    }

    #[test]
    fn test_recommendation_blocks() {
        // Mid-life, long horizon: base list only
        assert_eq!(recommendations(RiskProfile::Moderate, 40.0, 20.0).len(), 2);

        let young = recommendations(RiskProfile::Aggressive, 25.0, 20.0);
        assert_eq!(young.len(), 3);
        assert_eq!(young[2].title, "Age-based recommendations");

        let older_short = recommendations(RiskProfile::Conservative, 60.0, 3.0);
        assert_eq!(older_short.len(), 4);
        assert_eq!(older_short[3].title, "Horizon considerations");

        // Boundaries are exclusive
        assert_eq!(recommendations(RiskProfile::Moderate, 30.0, 5.0).len(), 2);
        assert_eq!(recommendations(RiskProfile::Moderate, 50.0, 5.0).len(), 2);
    }
}
