//! Scoring request wire format.

use crate::features::FeatureRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One transaction to score, as received from the serving layer.
///
/// Feature values arrive as raw strings (form-style); numeric coercion
/// happens during feature record construction, never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    /// Caller-assigned identifier, echoed in the result.
    pub request_id: String,

    /// Raw feature-name → value mapping.
    #[serde(default)]
    pub features: HashMap<String, String>,
}

impl ScoreRequest {
    pub fn new(request_id: String, features: HashMap<String, String>) -> Self {
        Self {
            request_id,
            features,
        }
    }

    /// Normalized numeric record for this request's features.
    pub fn to_record(&self) -> FeatureRecord {
        FeatureRecord::from_raw(&self.features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let mut features = HashMap::new();
        features.insert("transaction_amount".to_string(), "15000".to_string());

        let request = ScoreRequest::new("req_001".to_string(), features);

        let json = serde_json::to_string(&request).unwrap();
        let deserialized: ScoreRequest = serde_json::from_str(&json).unwrap();

        assert_eq!(request.request_id, deserialized.request_id);
        assert_eq!(
            deserialized.features.get("transaction_amount"),
            Some(&"15000".to_string())
        );
    }

    #[test]
    fn test_missing_features_field_defaults_to_empty() {
        let request: ScoreRequest = serde_json::from_str(r#"{"request_id": "req_002"}"#).unwrap();

        assert!(request.features.is_empty());
        assert!(request.to_record().is_empty());
    }

    #[test]
    fn test_to_record_coerces_values() {
        let mut features = HashMap::new();
        features.insert("login_attempts".to_string(), "abc".to_string());
        features.insert("merchant_risk".to_string(), "0.7".to_string());

        let record = ScoreRequest::new("req_003".to_string(), features).to_record();

        assert_eq!(record.get("login_attempts"), Some(0.0));
        assert_eq!(record.get("merchant_risk"), Some(0.7));
    }
}
