//! Persisted classifier bundle: scaler, forest and label encoding in one file

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use super::features::FEATURE_COUNT;
use super::forest::RandomForest;
use super::risk::RiskProfile;
use super::scaler::StandardScaler;
use crate::error::ProfileError;

/// Everything needed to classify, saved and loaded as a single JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub scaler: StandardScaler,
    pub forest: RandomForest,
    /// Class id -> profile
    pub labels: Vec<RiskProfile>,
}

impl ModelArtifact {
    /// Check that the parts agree with each other and with the feature layout
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.labels.is_empty() {
            return Err(ProfileError::InconsistentArtifact("no labels".to_string()));
        }
        for (i, label) in self.labels.iter().enumerate() {
            if self.labels[..i].contains(label) {
                return Err(ProfileError::InconsistentArtifact(format!("duplicate label {}", label)));
            }
        }
        if self.labels.len() != self.forest.n_classes {
            return Err(ProfileError::InconsistentArtifact(format!(
                "{} labels for a {}-class forest",
                self.labels.len(),
                self.forest.n_classes
            )));
        }
        if self.scaler.n_features() != FEATURE_COUNT || self.scaler.scales.len() != FEATURE_COUNT {
            return Err(ProfileError::InconsistentArtifact(format!(
                "scaler fitted on {} features, expected {}",
                self.scaler.n_features(),
                FEATURE_COUNT
            )));
        }
        if self.forest.n_features != FEATURE_COUNT {
            return Err(ProfileError::InconsistentArtifact(format!(
                "forest fitted on {} features, expected {}",
                self.forest.n_features, FEATURE_COUNT
            )));
        }
        self.forest.validate()
    }

    /// Read, parse and validate an artifact file
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let text = fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&text)?;
        artifact.validate()?;
        info!(
            "loaded profile model from {} ({} trees)",
            path.display(),
            artifact.forest.trees().len()
        );
        Ok(artifact)
    }

    /// Write to a sibling temp file, then rename over `path`
    ///
    /// A crash mid-write leaves either the previous file or none, never a
    /// truncated one.
    pub fn save(&self, path: &Path) -> Result<(), ProfileError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = temp_path(path);
        let json = serde_json::to_vec(self)?;
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        info!("saved profile model to {}", path.display());
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::forest::ForestParams;
    use crate::profile::synthetic::generate_training_set;

    fn small_artifact() -> ModelArtifact {
        let set = generate_training_set(300, 5).unwrap();
        let scaler = StandardScaler::fit(&set.features).unwrap();
        let x = scaler.transform_all(&set.features);
        let params = ForestParams { n_trees: 5, max_depth: 4, ..ForestParams::default() };
        let forest = RandomForest::fit(&x, &set.labels, 3, &params).unwrap();
        ModelArtifact { scaler, forest, labels: RiskProfile::ALL.to_vec() }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");
        let artifact = small_artifact();

        artifact.save(&path).unwrap();
        assert!(path.exists());
        assert!(!temp_path(&path).exists());

        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded.labels, artifact.labels);
        assert_eq!(loaded.forest.trees().len(), 5);
        assert_eq!(loaded.scaler.n_features(), FEATURE_COUNT);
    }

    #[test]
    fn test_corrupt_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "{\"scaler\": ").unwrap();
        assert!(matches!(ModelArtifact::load(&path), Err(ProfileError::Serialization(_))));

        let missing = dir.path().join("absent.json");
        assert!(matches!(ModelArtifact::load(&missing), Err(ProfileError::Io(_))));
    }

    #[test]
    fn test_inconsistent_parts_rejected() {
        let mut artifact = small_artifact();
        artifact.labels.pop();
        assert!(matches!(artifact.validate(), Err(ProfileError::InconsistentArtifact(_))));

        let mut artifact = small_artifact();
        artifact.labels[2] = RiskProfile::Conservative;
        assert!(matches!(artifact.validate(), Err(ProfileError::InconsistentArtifact(_))));

        let mut artifact = small_artifact();
        artifact.scaler.means.truncate(4);
        artifact.scaler.scales.truncate(4);
        assert!(matches!(artifact.validate(), Err(ProfileError::InconsistentArtifact(_))));
    }

    #[test]
    fn test_partial_artifact_detected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut artifact = small_artifact();
        artifact.labels.truncate(1);
        // Bypass validation on save to simulate a mismatched file on disk
        fs::write(&path, serde_json::to_string(&artifact).unwrap()).unwrap();
        assert!(matches!(
            ModelArtifact::load(&path),
            Err(ProfileError::InconsistentArtifact(_))
        ));
    }
}
