//! Long-horizon wealth projection under each profile's return assumption

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::risk::RiskProfile;

/// Years between checkpoints
pub const CHECKPOINT_STEP: u32 = 5;
/// Projections never extend past this many years
pub const MAX_PROJECTION_YEARS: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WealthProjectionPoint {
    pub age: u32,
    pub patrimony: f64,
}

/// Age-ascending checkpoints for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileProjection {
    pub annual_return: f64,
    pub points: Vec<WealthProjectionPoint>,
}

impl ProfileProjection {
    pub fn final_patrimony(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.patrimony)
    }
}

/// Project patrimony at 5-year checkpoints for every canonical profile
///
/// Each whole year applies `balance * (1 + r) + 12 * monthly_savings`,
/// floored at zero. Year 0 is always present.
pub fn project(
    current_age: u32,
    horizon_years: u32,
    current_patrimony: f64,
    monthly_savings: f64,
) -> BTreeMap<RiskProfile, ProfileProjection> {
    RiskProfile::ALL
        .iter()
        .map(|&profile| {
            (
                profile,
                project_profile(profile.projection_return(), current_age, horizon_years, current_patrimony, monthly_savings),
            )
        })
        .collect()
}

fn project_profile(
    annual_return: f64,
    current_age: u32,
    horizon_years: u32,
    current_patrimony: f64,
    monthly_savings: f64,
) -> ProfileProjection {
    let last = horizon_years.min(MAX_PROJECTION_YEARS);
    let annual_savings = monthly_savings * 12.0;

    let mut balance = current_patrimony.max(0.0);
    let mut elapsed = 0;
    let mut points = Vec::with_capacity((last / CHECKPOINT_STEP + 1) as usize);

    for checkpoint in (0..=last).step_by(CHECKPOINT_STEP as usize) {
        while elapsed < checkpoint {
            balance = (balance * (1.0 + annual_return) + annual_savings).max(0.0);
            elapsed += 1;
        }
        points.push(WealthProjectionPoint {
            age: current_age.saturating_add(checkpoint),
            patrimony: balance,
        });
    }

    ProfileProjection { annual_return, points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_checkpoints_and_ages() {
        let projections = project(30, 20, 10_000.0, 500.0);
        assert_eq!(projections.len(), 3);
        for projection in projections.values() {
            let ages: Vec<u32> = projection.points.iter().map(|p| p.age).collect();
            assert_eq!(ages, vec![30, 35, 40, 45, 50]);
            assert_eq!(projection.points[0].patrimony, 10_000.0);
        }
    }

    #[test]
    fn test_horizon_capped_at_forty_years() {
        let projections = project(25, 60, 0.0, 100.0);
        let points = &projections[&RiskProfile::Moderate].points;
        assert_eq!(points.len(), 9);
        assert_eq!(points.last().unwrap().age, 65);
    }

    #[test]
    fn test_short_horizon_keeps_year_zero() {
        let projections = project(40, 3, 5_000.0, 0.0);
        let points = &projections[&RiskProfile::Aggressive].points;
        assert_eq!(points, &vec![WealthProjectionPoint { age: 40, patrimony: 5_000.0 }]);
    }

    #[test]
    fn test_recurrence_matches_closed_form() {
        // FV of a lump sum plus an ordinary annuity of annual savings
        let (p0, annual, r) = (10_000.0_f64, 6_000.0_f64, 0.07_f64);
        let projections = project(30, 10, p0, annual / 12.0);
        let projection = &projections[&RiskProfile::Moderate];
        assert_eq!(projection.annual_return, 0.07);

        let growth = (1.0 + r).powi(10);
        let expected = p0 * growth + annual * (growth - 1.0) / r;
        assert_relative_eq!(projection.final_patrimony(), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_higher_return_ends_higher() {
        let projections = project(30, 30, 1_000.0, 200.0);
        let cons = projections[&RiskProfile::Conservative].final_patrimony();
        let mod_ = projections[&RiskProfile::Moderate].final_patrimony();
        let aggr = projections[&RiskProfile::Aggressive].final_patrimony();
        assert!(cons < mod_ && mod_ < aggr);
    }

    #[test]
    fn test_extreme_age_saturates() {
        let projections = project(u32::MAX - 3, 10, 100.0, 0.0);
        let ages: Vec<u32> = projections[&RiskProfile::Moderate].points.iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![u32::MAX - 3, u32::MAX, u32::MAX]);
    }

    #[test]
    fn test_withdrawals_floor_at_zero() {
        let projections = project(60, 20, 1_000.0, -500.0);
        for projection in projections.values() {
            assert!(projection.points.iter().all(|p| p.patrimony >= 0.0));
            assert_eq!(projection.final_patrimony(), 0.0);
        }
    }
}
