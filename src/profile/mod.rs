//! Investor profile classification
//!
//! Pipeline: questionnaire answers -> [`InvestorFeatureVector`] -> scaled row
//! -> random forest vote -> [`ProfileResult`] with static catalog lookups and
//! wealth projections attached.

pub mod artifact;
pub mod catalog;
pub mod classifier;
pub mod features;
pub mod forest;
pub mod projection;
pub mod risk;
pub mod scaler;
pub mod synthetic;

pub use artifact::ModelArtifact;
pub use catalog::{AllocationWeight, AssetAllocation, ProfileDescription, RecommendationBlock, SuggestedReturn};
pub use classifier::{fallback_result, ModelSource, ProfileClassifier, ProfileOutcome, ProfileResult};
pub use features::{FeatureInput, InvestorFeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use forest::{ForestParams, RandomForest};
pub use projection::{project, ProfileProjection, WealthProjectionPoint};
pub use risk::RiskProfile;
pub use scaler::StandardScaler;
pub use synthetic::{composite_score, generate_training_set, TrainingSet};
