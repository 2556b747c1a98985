//! Feature vectorization against the training-time schema.

use crate::error::ScoreError;
use crate::features::FeatureRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered feature-name schema learned when the model was fit.
///
/// The schema fixes both the set and the order of features the classifier
/// expects; scoring-time input is reshaped to match it exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vectorizer {
    pub feature_names: Vec<String>,
}

impl Vectorizer {
    pub fn new(feature_names: Vec<String>) -> Self {
        Self { feature_names }
    }

    /// Number of features the downstream model expects.
    pub fn dimension(&self) -> usize {
        self.feature_names.len()
    }

    /// Structural checks on the schema.
    ///
    /// A failure here means a corrupt artifact, not a bad request — surfaced
    /// at startup, never per request.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.feature_names.is_empty() {
            return Err(ScoreError::EmptySchema);
        }

        let mut seen = HashSet::new();
        for name in &self.feature_names {
            if !seen.insert(name.as_str()) {
                return Err(ScoreError::DuplicateFeature(name.clone()));
            }
        }

        Ok(())
    }

    /// Produce the fixed-order vector for one record.
    ///
    /// Schema keys missing from the record contribute 0.0; record keys
    /// unknown to the schema are ignored.
    pub fn transform(&self, record: &FeatureRecord) -> Vec<f64> {
        self.feature_names
            .iter()
            .map(|name| record.value_or(name, 0.0))
            .collect()
    }
}
