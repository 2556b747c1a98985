//! Feature record construction from raw request fields.
//!
//! Mirrors the preprocessing the model was trained with: every submitted
//! field becomes a finite f64, and malformed values degrade to 0.0 instead
//! of rejecting the request.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalized numeric view of one transaction's raw input fields.
///
/// Constructed once per request, never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord(HashMap<String, f64>);

impl FeatureRecord {
    /// Build a record from raw string-keyed form values.
    ///
    /// Every submitted key is kept. Values that are empty, fail to parse, or
    /// parse to a non-finite number are stored as 0.0 — this stage has no
    /// error path.
    pub fn from_raw(raw: &HashMap<String, String>) -> Self {
        let values = raw
            .iter()
            .map(|(key, value)| (key.clone(), coerce(value)))
            .collect();

        Self(values)
    }

    /// Value for `key`, if the key was submitted.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Value for `key`, or `default` when the key was never submitted.
    ///
    /// A submitted-but-malformed value is present as 0.0 and does NOT fall
    /// back to `default`.
    pub fn value_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    /// Number of submitted features.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, f64>> for FeatureRecord {
    fn from(values: HashMap<String, f64>) -> Self {
        Self(values)
    }
}

/// Parse one raw field value, defaulting to 0.0 on anything unusable.
fn coerce(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed,
        _ => 0.0,
    }
}
