//! Scoring outcome wire formats.

use crate::features::FeatureRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary verdict produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Fraud,
    Normal,
}

impl Verdict {
    /// Map the classifier's binary label (1 = fraud) to a verdict.
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Verdict::Fraud
        } else {
            Verdict::Normal
        }
    }
}

/// Final scoring outcome for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Unique result identifier.
    pub result_id: String,

    /// Request this result answers.
    pub request_id: String,

    /// Verdict label.
    pub verdict: Verdict,

    /// Class-1 probability as a percentage, rounded to two decimals.
    pub probability: f64,

    /// Echo of the normalized input record.
    pub features: FeatureRecord,

    /// Ordered rule-derived explanation. Never empty.
    pub reasons: Vec<String>,

    /// Scoring timestamp.
    pub scored_at: DateTime<Utc>,
}

impl ScoringResult {
    pub fn new(
        request_id: String,
        verdict: Verdict,
        probability: f64,
        features: FeatureRecord,
        reasons: Vec<String>,
    ) -> Self {
        Self {
            result_id: uuid::Uuid::new_v4().to_string(),
            request_id,
            verdict,
            probability,
            features,
            reasons,
            scored_at: Utc::now(),
        }
    }
}

/// Published instead of a result when the pipeline hits an internal error.
///
/// Carries no verdict: a broken artifact chain must never look like a
/// domain outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringFailure {
    /// Request the failure answers.
    pub request_id: String,

    /// Internal error description.
    pub error: String,

    /// Failure timestamp.
    pub failed_at: DateTime<Utc>,
}

impl ScoringFailure {
    pub fn new(request_id: String, error: String) -> Self {
        Self {
            request_id,
            error,
            failed_at: Utc::now(),
        }
    }
}
