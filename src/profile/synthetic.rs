//! Synthetic labelled training data for the profile classifier
//!
//! No real labelled questionnaires exist, so the model learns a
//! hand-specified suitability rule from seeded samples. Each feature is drawn
//! independently from a fixed distribution and clipped to its domain; the
//! label comes from thresholding a weighted composite score.

use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{LogNormal, Normal};

use super::features::{InvestorFeatureVector, FEATURE_COUNT};
use super::risk::RiskProfile;
use crate::error::ProfileError;

/// Composite score weights
pub const WEIGHT_TOLERANCE: f64 = 0.25;
pub const WEIGHT_HORIZON: f64 = 0.20;
pub const WEIGHT_AGE: f64 = 0.15;
pub const WEIGHT_INCOME: f64 = 0.10;
pub const WEIGHT_SAVINGS: f64 = 0.10;
pub const WEIGHT_EXPERIENCE: f64 = 0.05;
pub const WEIGHT_EDUCATION: f64 = 0.05;
pub const WEIGHT_GOAL: f64 = 0.05;
pub const WEIGHT_KNOWLEDGE: f64 = 0.05;

/// Feature rows with their class ids (index into `RiskProfile::ALL`)
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub features: Vec<[f64; FEATURE_COUNT]>,
    pub labels: Vec<usize>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sample count per class, in label-encoding order
    pub fn class_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }
}

/// Weighted suitability score; higher means more risk capacity
pub fn composite_score(v: &InvestorFeatureVector) -> f64 {
    let age_score = 1.0 - (v.age - 18.0) / 62.0;
    let horizon_score = (v.horizon / 40.0).powf(0.5);
    let tolerance_score = (v.risk_tolerance - 1.0) / 4.0;
    let income_score = (v.monthly_income / 10.0).log10() / 1.5;
    let savings_score = (v.savings_percentage / 60.0).powf(0.7);
    let experience_score = (v.experience_years / 40.0).powf(0.8);
    let education_score = (v.education_level - 1.0) / 4.0;
    let goal_score = (v.goal - 1.0) / 4.0;
    let knowledge_score = (v.financial_knowledge - 1.0) / 4.0;

    age_score * WEIGHT_AGE
        + horizon_score * WEIGHT_HORIZON
        + tolerance_score * WEIGHT_TOLERANCE
        + income_score * WEIGHT_INCOME
        + savings_score * WEIGHT_SAVINGS
        + experience_score * WEIGHT_EXPERIENCE
        + education_score * WEIGHT_EDUCATION
        + goal_score * WEIGHT_GOAL
        + knowledge_score * WEIGHT_KNOWLEDGE
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>, ProfileError> {
    Normal::new(mean, std_dev).map_err(|e| ProfileError::Sampling(e.to_string()))
}

fn categorical(weights: &[f64]) -> Result<WeightedIndex<f64>, ProfileError> {
    WeightedIndex::new(weights).map_err(|e| ProfileError::Sampling(e.to_string()))
}

/// Draw `n` clipped samples of a distribution
fn draw<D: Distribution<f64>>(dist: &D, rng: &mut StdRng, n: usize, lo: f64, hi: f64) -> Vec<f64> {
    (0..n).map(|_| dist.sample(&mut *rng).clamp(lo, hi)).collect()
}

/// Generate a labelled training set
///
/// # Arguments
/// * `n_samples` - Number of rows (must be > 0)
/// * `seed` - RNG seed; equal seeds give identical sets
pub fn generate_training_set(n_samples: usize, seed: u64) -> Result<TrainingSet, ProfileError> {
    if n_samples == 0 {
        return Err(ProfileError::EmptyTrainingSet);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let n = n_samples;

    let ages = draw(&normal(45.0, 15.0)?, &mut rng, n, 18.0, 80.0);
    let horizons = draw(&normal(20.0, 10.0)?, &mut rng, n, 1.0, 40.0);
    let tolerances = draw(&normal(3.0, 1.5)?, &mut rng, n, 1.0, 5.0);
    let income_dist = LogNormal::new(3.5, 0.6).map_err(|e| ProfileError::Sampling(e.to_string()))?;
    let incomes = draw(&income_dist, &mut rng, n, 10.0, 300.0);
    let savings = draw(&normal(15.0, 8.0)?, &mut rng, n, 1.0, 60.0);
    let experience = draw(&normal(8.0, 7.0)?, &mut rng, n, 0.0, 40.0);

    let wealth_noise = normal(1.0, 0.3)?;
    let net_worth: Vec<f64> = (0..n)
        .map(|i| {
            let noise = wealth_noise.sample(&mut rng);
            (incomes[i] * 12.0 * (ages[i] - 20.0) * 0.3 * noise).clamp(0.0, 5_000_000.0)
        })
        .collect();

    let education_dist = categorical(&[0.1, 0.2, 0.4, 0.2, 0.1])?;
    let education: Vec<f64> = (0..n).map(|_| (education_dist.sample(&mut rng) + 1) as f64).collect();
    let goal_dist = categorical(&[0.15, 0.25, 0.3, 0.2, 0.1])?;
    let goals: Vec<f64> = (0..n).map(|_| (goal_dist.sample(&mut rng) + 1) as f64).collect();
    let knowledge = draw(&normal(3.0, 1.2)?, &mut rng, n, 1.0, 5.0);

    let debt_noise = normal(500.0, 200.0)?;
    let debt_capacity: Vec<f64> = (0..n)
        .map(|i| (incomes[i] * 0.3 - debt_noise.sample(&mut rng)).clamp(0.0, 10_000.0))
        .collect();

    let mut features = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let row = [
            ages[i],
            horizons[i],
            tolerances[i],
            incomes[i],
            savings[i],
            experience[i],
            net_worth[i],
            education[i],
            goals[i],
            knowledge[i],
            debt_capacity[i],
        ];
        let profile = RiskProfile::from_score(composite_score(&InvestorFeatureVector::from_array(row)));
        features.push(row);
        labels.push(profile as usize);
    }

    let set = TrainingSet { features, labels };
    debug!("synthesised {} training rows, class counts {:?}", set.len(), set.class_counts());
    Ok(set)
}
