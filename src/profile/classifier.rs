//! Investor profile classifier
//!
//! Wraps a persisted [`ModelArtifact`] and turns raw questionnaire answers into
//! a [`ProfileOutcome`]. Prediction never returns an error: any internal
//! failure becomes [`ProfileOutcome::Fallback`] carrying a fixed moderate
//! result and the reason.

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::artifact::ModelArtifact;
use super::catalog::{self, AssetAllocation, ProfileDescription, RecommendationBlock, SuggestedReturn};
use super::features::{FeatureInput, InvestorFeatureVector, FEATURE_NAMES};
use super::forest::{argmax, RandomForest};
use super::projection::{project, ProfileProjection};
use super::risk::RiskProfile;
use super::scaler::StandardScaler;
use super::synthetic::generate_training_set;
use crate::config::ClassifierConfig;
use crate::error::ProfileError;

/// Age assumed by recommendations and projections when not answered
const DEFAULT_AGE: f64 = 30.0;
/// Horizon assumed by recommendations when not answered
const DEFAULT_RECOMMENDATION_HORIZON: f64 = 10.0;
/// Horizon assumed by projections when not answered
const DEFAULT_PROJECTION_HORIZON: f64 = 20.0;
/// Savings share, in percent, assumed by projections when not answered
const DEFAULT_SAVINGS_PERCENTAGE: f64 = 20.0;
/// Oldest age answer accepted
const MAX_AGE: f64 = 150.0;

/// Where the classifier's model came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    /// Read from an existing artifact
    Loaded,
    /// No artifact existed; trained from synthetic data
    Trained,
    /// Artifact was unusable and was replaced
    Rebuilt,
}

/// Full classification report for one investor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResult {
    pub profile: RiskProfile,
    /// Vote share of the predicted class, 0-100, one decimal
    pub confidence: f64,
    /// Global model importances keyed by feature name
    pub feature_importances: BTreeMap<String, f64>,
    pub suggested_return: SuggestedReturn,
    pub asset_allocation: AssetAllocation,
    pub recommendations: Vec<RecommendationBlock>,
    pub projections: BTreeMap<RiskProfile, ProfileProjection>,
}

impl ProfileResult {
    pub fn description(&self) -> ProfileDescription {
        catalog::describe(self.profile)
    }
}

/// Result of [`ProfileClassifier::predict`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ProfileOutcome {
    Classified(ProfileResult),
    /// Prediction failed internally; `result` is [`fallback_result`]
    Fallback { result: ProfileResult, reason: String },
}

impl ProfileOutcome {
    pub fn result(&self) -> &ProfileResult {
        match self {
            ProfileOutcome::Classified(result) => result,
            ProfileOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> ProfileResult {
        match self {
            ProfileOutcome::Classified(result) => result,
            ProfileOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ProfileOutcome::Fallback { .. })
    }
}

/// Fixed result reported when prediction fails
///
/// Moderate profile, zero confidence, the moderate return band and nothing
/// else.
pub fn fallback_result() -> ProfileResult {
    ProfileResult {
        profile: RiskProfile::Moderate,
        confidence: 0.0,
        feature_importances: BTreeMap::new(),
        suggested_return: SuggestedReturn::FALLBACK,
        asset_allocation: AssetAllocation::default(),
        recommendations: Vec::new(),
        projections: BTreeMap::new(),
    }
}

/// Trained classifier, passed explicitly to whoever needs predictions
#[derive(Debug, Clone)]
pub struct ProfileClassifier {
    artifact: ModelArtifact,
    source: ModelSource,
}

/// Synthesise data, fit scaler and forest, bundle them
fn train_artifact(config: &ClassifierConfig) -> Result<ModelArtifact, ProfileError> {
    let set = generate_training_set(config.samples, config.seed)?;
    let scaler = StandardScaler::fit(&set.features)?;
    let x = scaler.transform_all(&set.features);
    let forest = RandomForest::fit(&x, &set.labels, RiskProfile::ALL.len(), &config.forest_params())?;

    let artifact = ModelArtifact {
        scaler,
        forest,
        labels: RiskProfile::ALL.to_vec(),
    };
    artifact.validate()?;
    info!(
        "trained profile model on {} rows ({} trees, class counts {:?})",
        set.len(),
        config.trees,
        set.class_counts()
    );
    Ok(artifact)
}

impl ProfileClassifier {
    /// Train in memory without touching disk
    pub fn train(config: &ClassifierConfig) -> Result<Self, ProfileError> {
        Ok(Self {
            artifact: train_artifact(config)?,
            source: ModelSource::Trained,
        })
    }

    /// Load the artifact at `config.model_path`, training one if needed
    ///
    /// An unreadable or inconsistent artifact is replaced. A failed save is
    /// logged; the in-memory model is still returned.
    pub fn load_or_train(config: &ClassifierConfig) -> Result<Self, ProfileError> {
        let path = config.model_path.as_path();
        let source = if path.exists() {
            match ModelArtifact::load(path) {
                Ok(artifact) => {
                    return Ok(Self {
                        artifact,
                        source: ModelSource::Loaded,
                    })
                }
                Err(e) => {
                    warn!("profile model at {} is unusable ({}); rebuilding", path.display(), e);
                    ModelSource::Rebuilt
                }
            }
        } else {
            ModelSource::Trained
        };

        let artifact = train_artifact(config)?;
        if let Err(e) = artifact.save(path) {
            warn!("could not save profile model to {}: {}", path.display(), e);
        }
        Ok(Self { artifact, source })
    }

    /// Train and save unconditionally; save failures are errors here
    pub fn rebuild(config: &ClassifierConfig) -> Result<Self, ProfileError> {
        let artifact = train_artifact(config)?;
        artifact.save(&config.model_path)?;
        Ok(Self {
            artifact,
            source: ModelSource::Rebuilt,
        })
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ProfileError> {
        artifact.validate()?;
        Ok(Self {
            artifact,
            source: ModelSource::Loaded,
        })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn source(&self) -> ModelSource {
        self.source
    }

    /// Global importances keyed by feature name
    pub fn feature_importances(&self) -> BTreeMap<String, f64> {
        FEATURE_NAMES
            .iter()
            .zip(self.artifact.forest.feature_importances())
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    /// Classify raw answers; missing features count as 0
    pub fn predict(&self, input: &FeatureInput) -> ProfileOutcome {
        match self.try_predict(input) {
            Ok(result) => ProfileOutcome::Classified(result),
            Err(e) => {
                warn!("profile prediction fell back to the default result: {}", e);
                ProfileOutcome::Fallback {
                    result: fallback_result(),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn predict_vector(&self, vector: &InvestorFeatureVector) -> ProfileOutcome {
        self.predict(&vector.to_input())
    }

    fn try_predict(&self, input: &FeatureInput) -> Result<ProfileResult, ProfileError> {
        let row = InvestorFeatureVector::from_input(input).to_array();
        if let Some((feature, value)) = FEATURE_NAMES.iter().zip(row).find(|(_, v)| !v.is_finite()) {
            return Err(ProfileError::NonFiniteFeature { feature: *feature, value });
        }
        let answer = |key: &str, default: f64| input.get(key).copied().unwrap_or(default);
        let age = answer("age", DEFAULT_AGE);
        if !(0.0..=MAX_AGE).contains(&age) {
            return Err(ProfileError::FeatureOutOfRange { feature: "age", value: age });
        }
        let age_years = whole_years(age);

        let scaled = self.artifact.scaler.transform(&row);
        let proba = self.artifact.forest.predict_proba(&scaled);
        let class = argmax(&proba);
        let profile = *self.artifact.labels.get(class).ok_or_else(|| {
            ProfileError::InconsistentArtifact(format!("class {} has no label", class))
        })?;
        let confidence = (proba[class] * 1000.0).round() / 10.0;

        let savings_percentage = answer("savings_percentage", DEFAULT_SAVINGS_PERCENTAGE);
        let monthly_savings = answer("monthly_income", 0.0) * savings_percentage / 100.0;

        Ok(ProfileResult {
            profile,
            confidence,
            feature_importances: self.feature_importances(),
            suggested_return: catalog::suggested_return(profile),
            asset_allocation: catalog::asset_allocation(profile),
            recommendations: catalog::recommendations(
                profile,
                f64::from(age_years),
                answer("horizon", DEFAULT_RECOMMENDATION_HORIZON),
            ),
            projections: project(
                age_years,
                whole_years(answer("horizon", DEFAULT_PROJECTION_HORIZON)),
                answer("net_worth", 0.0),
                monthly_savings,
            ),
        })
    }
}

fn whole_years(value: f64) -> u32 {
    value.round().clamp(0.0, u32::MAX as f64) as u32
}
