//! Pre-fitted affine feature scaling.

use crate::error::ScoreError;
use serde::{Deserialize, Serialize};

/// Per-feature centering and scaling parameters learned at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Learned dimensionality.
    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    /// Structural checks on the parameters. Fatal at load time.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.mean.len() != self.scale.len() {
            return Err(ScoreError::DimensionMismatch {
                stage: "scaler parameters",
                expected: self.mean.len(),
                got: self.scale.len(),
            });
        }

        for (index, &value) in self.mean.iter().enumerate() {
            if !value.is_finite() {
                return Err(ScoreError::NonFiniteParam {
                    what: "scaler mean",
                    index,
                    value,
                });
            }
        }

        for (index, &value) in self.scale.iter().enumerate() {
            if !value.is_finite() {
                return Err(ScoreError::NonFiniteParam {
                    what: "scaler scale",
                    index,
                    value,
                });
            }
            if value == 0.0 {
                return Err(ScoreError::ZeroScale(index));
            }
        }

        Ok(())
    }

    /// Apply the fitted normalization: `(x[i] - mean[i]) / scale[i]`.
    ///
    /// A length mismatch means the artifacts are out of sync — an internal
    /// error, never a recoverable per-request condition.
    pub fn transform(&self, vector: &[f64]) -> Result<Vec<f64>, ScoreError> {
        if vector.len() != self.mean.len() {
            return Err(ScoreError::DimensionMismatch {
                stage: "scaler",
                expected: self.mean.len(),
                got: vector.len(),
            });
        }

        Ok(vector
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect())
    }
}
