//! Per-feature standardisation (zero mean, unit variance)

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Fitted mean and scale for every feature column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub means: Vec<f64>,
    /// Population standard deviation; 1.0 for constant columns
    pub scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit on rows of equal width
    pub fn fit<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, ProfileError> {
        let first = rows.first().ok_or(ProfileError::EmptyTrainingSet)?;
        let width = first.as_ref().len();
        let n = rows.len() as f64;

        let mut means = vec![0.0; width];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row.as_ref()) {
                *mean += value / n;
            }
        }

        let mut scales = vec![0.0; width];
        for row in rows {
            for ((var, value), mean) in scales.iter_mut().zip(row.as_ref()).zip(&means) {
                *var += (value - mean).powi(2) / n;
            }
        }
        for scale in scales.iter_mut() {
            *scale = if *scale > 0.0 { scale.sqrt() } else { 1.0 };
        }

        Ok(Self { means, scales })
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    /// Standardise one row
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect()
    }

    pub fn transform_all<R: AsRef<[f64]>>(&self, rows: &[R]) -> Vec<Vec<f64>> {
        rows.iter().map(|row| self.transform(row.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fit_and_transform() {
        let rows = vec![[1.0, 10.0], [2.0, 10.0], [3.0, 10.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();

        assert_abs_diff_eq!(scaler.means[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scaler.scales[0], (2.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
        // Constant column keeps unit scale
        assert_eq!(scaler.scales[1], 1.0);

        let transformed = scaler.transform_all(&rows);
        let mean: f64 = transformed.iter().map(|r| r[0]).sum::<f64>() / 3.0;
        let var: f64 = transformed.iter().map(|r| r[0] * r[0]).sum::<f64>() / 3.0;
        assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(var, 1.0, epsilon = 1e-12);
        assert_eq!(transformed[0][1], 0.0);
    }

    #[test]
    fn test_fit_empty_rejected() {
        let rows: Vec<[f64; 2]> = Vec::new();
        assert!(matches!(StandardScaler::fit(&rows), Err(ProfileError::EmptyTrainingSet)));
    }
}
