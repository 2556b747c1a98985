//! The scoring pipeline: vectorize → scale → classify → explain.

use crate::artifacts::ModelArtifacts;
use crate::error::ScoreError;
use crate::features::FeatureRecord;
use crate::rules;
use crate::types::score::{ScoringResult, Verdict};
use std::sync::Arc;
use tracing::debug;

/// Orchestrates the adapter chain over one request.
///
/// Holds the process-wide artifact triple; scoring is a pure function of the
/// record plus those immutable artifacts, so a single pipeline value is
/// shared across all concurrent requests without locking.
#[derive(Clone)]
pub struct ScoringPipeline {
    artifacts: Arc<ModelArtifacts>,
}

impl ScoringPipeline {
    pub fn new(artifacts: Arc<ModelArtifacts>) -> Self {
        Self { artifacts }
    }

    /// Score one request: a single linear pass with no retries.
    ///
    /// Vectorization cannot fail on a validated schema; scaling and
    /// classification fail only when the artifacts are out of sync or the
    /// numbers degenerate, and that surfaces as an error rather than a
    /// defaulted verdict.
    pub fn score(
        &self,
        request_id: &str,
        record: &FeatureRecord,
    ) -> Result<ScoringResult, ScoreError> {
        let vector = self.artifacts.vectorizer.transform(record);
        let scaled = self.artifacts.scaler.transform(&vector)?;
        let prediction = self.artifacts.classifier.predict(&scaled)?;

        // Reasons read the raw record and the fixed rule table only;
        // retraining the classifier does not change them.
        let reasons = rules::explain(record);

        let verdict = Verdict::from_label(prediction.label);

        debug!(
            request_id,
            ?verdict,
            probability = prediction.probability,
            reasons = reasons.len(),
            "Request scored"
        );

        Ok(ScoringResult::new(
            request_id.to_string(),
            verdict,
            as_percentage(prediction.probability),
            record.clone(),
            reasons,
        ))
    }
}

/// Probability as a percentage rounded to exactly two decimal places.
fn as_percentage(probability: f64) -> f64 {
    (probability * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{LinearClassifier, Scaler, Vectorizer};
    use std::collections::HashMap;

    const FEATURES: [&str; 5] = [
        "transaction_amount",
        "login_attempts",
        "transaction_time",
        "vpn_used",
        "merchant_risk",
    ];

    fn test_artifacts(weights: Vec<f64>, intercept: f64) -> Arc<ModelArtifacts> {
        let artifacts = ModelArtifacts::new(
            Vectorizer::new(FEATURES.iter().map(|s| s.to_string()).collect()),
            Scaler::new(
                vec![500.0, 1.0, 12.0, 0.0, 0.5],
                vec![1000.0, 2.0, 6.0, 1.0, 0.25],
            ),
            LinearClassifier::new(weights, intercept),
        );
        artifacts.validate().unwrap();
        Arc::new(artifacts)
    }

    fn pipeline() -> ScoringPipeline {
        ScoringPipeline::new(test_artifacts(vec![2.0, 0.5, -0.5, 1.0, 0.8], -1.0))
    }

    fn record(pairs: &[(&str, &str)]) -> FeatureRecord {
        let raw: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FeatureRecord::from_raw(&raw)
    }

    #[test]
    fn test_empty_input_scores_without_failing() {
        let result = pipeline().score("req_empty", &record(&[])).unwrap();

        // Rule defaults on an empty record: only the merchant-risk rule fires.
        assert_eq!(result.reasons, vec!["Merchant risk is low".to_string()]);
        assert!(result.probability >= 0.0 && result.probability <= 100.0);
    }

    #[test]
    fn test_reasons_are_never_empty() {
        let result = pipeline()
            .score("req_quiet", &record(&[("merchant_risk", "0.9")]))
            .unwrap();

        assert_eq!(
            result.reasons,
            vec!["All values are within normal range".to_string()]
        );
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let p = pipeline();
        let input = record(&[
            ("transaction_amount", "15000"),
            ("login_attempts", "2"),
            ("vpn_used", "1"),
        ]);

        let first = p.score("req_a", &input).unwrap();
        let second = p.score("req_a", &input).unwrap();

        assert_eq!(first.verdict, second.verdict);
        assert_eq!(first.probability.to_bits(), second.probability.to_bits());
        assert_eq!(first.reasons, second.reasons);
    }

    #[test]
    fn test_probability_is_a_two_decimal_percentage() {
        assert_eq!(as_percentage(0.8734), 87.34);
        assert_eq!(as_percentage(0.0), 0.0);
        assert_eq!(as_percentage(1.0), 100.0);
        assert_eq!(as_percentage(0.123456), 12.35);

        let result = pipeline()
            .score("req_pct", &record(&[("transaction_amount", "20000")]))
            .unwrap();

        assert!(result.probability >= 0.0 && result.probability <= 100.0);
        assert_eq!(
            result.probability,
            (result.probability * 100.0).round() / 100.0
        );
    }

    #[test]
    fn test_reasons_do_not_depend_on_classifier_weights() {
        let input = record(&[
            ("transaction_amount", "15000"),
            ("login_attempts", "2"),
            ("vpn_used", "1"),
        ]);

        let original = ScoringPipeline::new(test_artifacts(vec![2.0, 0.5, -0.5, 1.0, 0.8], -1.0))
            .score("req_r", &input)
            .unwrap();
        let retrained =
            ScoringPipeline::new(test_artifacts(vec![-3.0, 0.1, 0.4, -2.0, 0.0], 5.0))
                .score("req_r", &input)
                .unwrap();

        assert_eq!(original.reasons, retrained.reasons);
    }

    #[test]
    fn test_high_amount_vpn_scenario_reasons() {
        let result = pipeline()
            .score(
                "req_scenario",
                &record(&[
                    ("transaction_amount", "15000"),
                    ("login_attempts", "2"),
                    ("vpn_used", "1"),
                ]),
            )
            .unwrap();

        assert_eq!(
            result.reasons,
            vec![
                "High transaction amount detected".to_string(),
                "VPN usage detected".to_string(),
                "Merchant risk is low".to_string(),
            ]
        );
    }

    #[test]
    fn test_malformed_field_still_produces_a_verdict() {
        let result = pipeline()
            .score("req_bad", &record(&[("login_attempts", "abc")]))
            .unwrap();

        assert_eq!(result.features.get("login_attempts"), Some(0.0));
        assert!(!result.reasons.contains(&"Multiple login attempts detected".to_string()));
    }

    #[test]
    fn test_unknown_features_are_ignored() {
        let p = pipeline();

        let plain = p.score("req_u", &record(&[])).unwrap();
        let extra = p
            .score("req_u", &record(&[("never_trained_on", "123456")]))
            .unwrap();

        assert_eq!(plain.verdict, extra.verdict);
        assert_eq!(plain.probability, extra.probability);
    }

    #[test]
    fn test_out_of_sync_artifacts_error_per_request() {
        // Bypass startup validation to exercise the per-request guard.
        let artifacts = ModelArtifacts::new(
            Vectorizer::new(FEATURES.iter().map(|s| s.to_string()).collect()),
            Scaler::new(vec![0.0, 0.0], vec![1.0, 1.0]),
            LinearClassifier::new(vec![1.0, 1.0], 0.0),
        );
        let p = ScoringPipeline::new(Arc::new(artifacts));

        let err = p.score("req_drift", &record(&[])).unwrap_err();

        assert!(matches!(
            err,
            ScoreError::DimensionMismatch { stage: "scaler", .. }
        ));
    }

    #[test]
    fn test_result_echoes_the_input_record() {
        let input = record(&[("transaction_amount", "42")]);

        let result = pipeline().score("req_echo", &input).unwrap();

        assert_eq!(result.features, input);
        assert_eq!(result.request_id, "req_echo");
    }

    #[test]
    fn test_fraud_and_normal_verdicts_are_reachable() {
        let p = pipeline();

        // Large amount pushes the positive-weight first feature hard.
        let fraud = p
            .score("req_f", &record(&[("transaction_amount", "100000")]))
            .unwrap();
        // Strongly negative amount pulls the decision value down.
        let normal = p
            .score("req_n", &record(&[("transaction_amount", "-100000")]))
            .unwrap();

        assert_eq!(fraud.verdict, Verdict::Fraud);
        assert!(fraud.probability > 50.0);
        assert_eq!(normal.verdict, Verdict::Normal);
        assert!(normal.probability < 50.0);
    }
}
