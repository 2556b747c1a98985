//! Pre-fitted linear binary classifier.

use crate::error::ScoreError;
use serde::{Deserialize, Serialize};

/// Weights of an online-trained linear decision function.
///
/// Class-1 probability is the logistic sigmoid of the decision value, so the
/// label and the probability always agree: label 1 exactly when probability
/// reaches 0.5.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

/// Output of one classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Binary class label: 1 = fraud, 0 = normal.
    pub label: u8,
    /// Class-1 probability in [0, 1].
    pub probability: f64,
}

impl LinearClassifier {
    pub fn new(weights: Vec<f64>, intercept: f64) -> Self {
        Self { weights, intercept }
    }

    /// Learned dimensionality.
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    /// Structural checks on the weights. Fatal at load time.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.weights.is_empty() {
            return Err(ScoreError::EmptyWeights);
        }

        for (index, &value) in self.weights.iter().enumerate() {
            if !value.is_finite() {
                return Err(ScoreError::NonFiniteParam {
                    what: "classifier weight",
                    index,
                    value,
                });
            }
        }

        if !self.intercept.is_finite() {
            return Err(ScoreError::NonFiniteIntercept(self.intercept));
        }

        Ok(())
    }

    /// Classify one scaled vector.
    ///
    /// Deterministic: a fixed artifact and a fixed input always produce the
    /// same bits. A NaN or infinity in the input is reported as an internal
    /// error, never coerced into a verdict.
    pub fn predict(&self, vector: &[f64]) -> Result<Prediction, ScoreError> {
        if vector.len() != self.weights.len() {
            return Err(ScoreError::DimensionMismatch {
                stage: "classifier",
                expected: self.weights.len(),
                got: vector.len(),
            });
        }

        for (index, &value) in vector.iter().enumerate() {
            if !value.is_finite() {
                return Err(ScoreError::NonFiniteInput { index, value });
            }
        }

        let decision: f64 = vector
            .iter()
            .zip(self.weights.iter())
            .map(|(value, weight)| value * weight)
            .sum::<f64>()
            + self.intercept;

        let probability = sigmoid(decision);
        let label = u8::from(probability >= 0.5);

        Ok(Prediction { label, probability })
    }
}

/// Numerically stable logistic sigmoid.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let ez = z.exp();
        ez / (1.0 + ez)
    }
}
