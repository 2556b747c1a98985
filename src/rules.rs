//! Threshold rule table for human-readable scoring explanations.
//!
//! The rules are an auditable second opinion on the transaction: they read
//! the raw feature record, not the scaled vector, so their output depends
//! only on the input and the fixed table below. Retraining the classifier
//! never changes which reasons fire.

use crate::features::FeatureRecord;

/// Whether a fired rule counts against the transaction or in its favor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Negative,
    Positive,
}

/// Threshold predicate applied to a single feature value.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    Above(f64),
    Below(f64),
    Equals(f64),
}

impl Condition {
    fn matches(&self, value: f64) -> bool {
        match *self {
            Condition::Above(threshold) => value > threshold,
            Condition::Below(threshold) => value < threshold,
            Condition::Equals(expected) => value == expected,
        }
    }
}

/// One entry of the explanation table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Feature key looked up in the raw record.
    pub feature: &'static str,
    /// Value assumed when the key was never submitted. Rule-specific: an
    /// absent transaction_time means midday, not midnight.
    pub default: f64,
    pub condition: Condition,
    pub reason: &'static str,
    pub polarity: Polarity,
}

/// Fixed rule table. Table order is output order; every matching rule fires,
/// none short-circuits the rest. New rules are appended here rather than
/// threaded through control flow.
pub const RULES: &[Rule] = &[
    Rule {
        feature: "transaction_amount",
        default: 0.0,
        condition: Condition::Above(10_000.0),
        reason: "High transaction amount detected",
        polarity: Polarity::Negative,
    },
    Rule {
        feature: "login_attempts",
        default: 0.0,
        condition: Condition::Above(5.0),
        reason: "Multiple login attempts detected",
        polarity: Polarity::Negative,
    },
    Rule {
        feature: "transaction_time",
        default: 12.0,
        condition: Condition::Below(5.0),
        reason: "Transaction at unusual hours",
        polarity: Polarity::Negative,
    },
    Rule {
        feature: "vpn_used",
        default: 0.0,
        condition: Condition::Equals(1.0),
        reason: "VPN usage detected",
        polarity: Polarity::Negative,
    },
    Rule {
        feature: "merchant_risk",
        default: 0.0,
        condition: Condition::Below(0.5),
        reason: "Merchant risk is low",
        polarity: Polarity::Positive,
    },
];

/// Reason emitted when nothing in the table fires.
pub const FALLBACK_REASON: &str = "All values are within normal range";

/// Evaluate the table against a record, in table order.
///
/// The returned sequence is never empty: when no rule fires, the fallback
/// reason is the sole entry.
pub fn explain(record: &FeatureRecord) -> Vec<String> {
    let mut reasons: Vec<String> = RULES
        .iter()
        .filter(|rule| {
            rule.condition
                .matches(record.value_or(rule.feature, rule.default))
        })
        .map(|rule| rule.reason.to_string())
        .collect();

    if reasons.is_empty() {
        reasons.push(FALLBACK_REASON.to_string());
    }

    reasons
}
