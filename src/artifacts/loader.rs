//! Artifact loading and startup validation.

use crate::artifacts::classifier::LinearClassifier;
use crate::artifacts::scaler::Scaler;
use crate::artifacts::vectorizer::Vectorizer;
use crate::error::ScoreError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::info;

/// Fixed artifact file names inside the configured directory.
pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";

/// The pre-trained artifact triple.
///
/// Loaded once at startup, validated, then shared read-only (behind an `Arc`)
/// across all concurrent requests for the process lifetime. Nothing in the
/// pipeline mutates it and there is no hot-reload.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub vectorizer: Vectorizer,
    pub scaler: Scaler,
    pub classifier: LinearClassifier,
}

impl ModelArtifacts {
    pub fn new(vectorizer: Vectorizer, scaler: Scaler, classifier: LinearClassifier) -> Self {
        Self {
            vectorizer,
            scaler,
            classifier,
        }
    }

    /// Validate each artifact, then cross-check that all three agree on
    /// dimensionality.
    ///
    /// A failure means the triple is out of sync; the process must not serve
    /// traffic, because a mismatched chain could produce plausible-looking
    /// but wrong verdicts.
    pub fn validate(&self) -> Result<(), ScoreError> {
        self.vectorizer.validate()?;
        self.scaler.validate()?;
        self.classifier.validate()?;

        let dimension = self.vectorizer.dimension();

        if self.scaler.dimension() != dimension {
            return Err(ScoreError::DimensionMismatch {
                stage: "scaler",
                expected: dimension,
                got: self.scaler.dimension(),
            });
        }

        if self.classifier.dimension() != dimension {
            return Err(ScoreError::DimensionMismatch {
                stage: "classifier",
                expected: dimension,
                got: self.classifier.dimension(),
            });
        }

        Ok(())
    }

    /// Load the triple from fixed-name JSON files in `dir`.
    ///
    /// Any read, parse, or validation failure is fatal — a partially loaded
    /// model must never score traffic.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        let vectorizer: Vectorizer = read_json(&dir.join(VECTORIZER_FILE))?;
        let scaler: Scaler = read_json(&dir.join(SCALER_FILE))?;
        let classifier: LinearClassifier = read_json(&dir.join(CLASSIFIER_FILE))?;

        let artifacts = Self::new(vectorizer, scaler, classifier);
        artifacts
            .validate()
            .context("Artifact validation failed after load")?;

        info!(
            dir = %dir.display(),
            features = artifacts.vectorizer.dimension(),
            "Model artifacts loaded"
        );

        Ok(artifacts)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse artifact {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_consistent_triple_validates() {
        let artifacts = ModelArtifacts::new(
            Vectorizer::new(names(&["a", "b"])),
            Scaler::new(vec![0.0, 0.0], vec![1.0, 1.0]),
            LinearClassifier::new(vec![0.5, -0.5], 0.0),
        );

        assert!(artifacts.validate().is_ok());
    }

    #[test]
    fn test_scaler_dimension_drift_is_fatal() {
        let artifacts = ModelArtifacts::new(
            Vectorizer::new(names(&["a", "b"])),
            Scaler::new(vec![0.0], vec![1.0]),
            LinearClassifier::new(vec![0.5, -0.5], 0.0),
        );

        assert!(matches!(
            artifacts.validate(),
            Err(ScoreError::DimensionMismatch {
                stage: "scaler",
                expected: 2,
                got: 1,
            })
        ));
    }

    #[test]
    fn test_classifier_dimension_drift_is_fatal() {
        let artifacts = ModelArtifacts::new(
            Vectorizer::new(names(&["a", "b"])),
            Scaler::new(vec![0.0, 0.0], vec![1.0, 1.0]),
            LinearClassifier::new(vec![0.5], 0.0),
        );

        assert!(matches!(
            artifacts.validate(),
            Err(ScoreError::DimensionMismatch {
                stage: "classifier",
                ..
            })
        ));
    }

    #[test]
    fn test_vectorizer_artifact_parses() {
        let vectorizer: Vectorizer =
            serde_json::from_str(r#"{"feature_names": ["transaction_amount", "vpn_used"]}"#)
                .unwrap();

        assert_eq!(vectorizer.dimension(), 2);
        assert_eq!(vectorizer.feature_names[0], "transaction_amount");
    }

    #[test]
    fn test_scaler_artifact_parses() {
        let scaler: Scaler =
            serde_json::from_str(r#"{"mean": [120.5, 0.2], "scale": [340.0, 0.4]}"#).unwrap();

        assert_eq!(scaler.dimension(), 2);
        assert!(scaler.validate().is_ok());
    }

    #[test]
    fn test_classifier_artifact_parses() {
        let classifier: LinearClassifier =
            serde_json::from_str(r#"{"weights": [1.2, -0.7], "intercept": -0.3}"#).unwrap();

        assert_eq!(classifier.dimension(), 2);
        assert!(classifier.validate().is_ok());
    }

    #[test]
    fn test_malformed_artifact_json_is_an_error() {
        let result: std::result::Result<Scaler, _> =
            serde_json::from_str(r#"{"mean": "not-a-vector"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_directory_fails_load() {
        let result = ModelArtifacts::load_from_dir("/nonexistent/artifacts");

        assert!(result.is_err());
    }
}
