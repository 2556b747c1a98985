//! Error types for the scoring pipeline

use thiserror::Error;

/// Errors raised by artifact validation and the scoring pipeline.
///
/// Per-field input problems are never errors — they coerce to 0.0 during
/// feature record construction. Everything here means a corrupt or out-of-sync
/// artifact, or numeric degeneracy that must not silently turn into a verdict.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// A vector length disagrees with an artifact's learned dimensionality.
    #[error("dimension mismatch in {stage}: expected {expected}, got {got}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        got: usize,
    },

    /// The vectorizer schema holds no feature names.
    #[error("vectorizer schema is empty")]
    EmptySchema,

    /// The vectorizer schema lists the same feature twice.
    #[error("duplicate feature '{0}' in vectorizer schema")]
    DuplicateFeature(String),

    /// A scaler scale entry is zero.
    #[error("zero scale entry at index {0}")]
    ZeroScale(usize),

    /// An artifact parameter is NaN or infinite.
    #[error("non-finite {what} at index {index}: {value}")]
    NonFiniteParam {
        what: &'static str,
        index: usize,
        value: f64,
    },

    /// The classifier intercept is NaN or infinite.
    #[error("non-finite intercept: {0}")]
    NonFiniteIntercept(f64),

    /// The classifier has no weights.
    #[error("classifier weight vector is empty")]
    EmptyWeights,

    /// A NaN or infinite value reached the classifier input.
    #[error("non-finite value at index {index} of classifier input: {value}")]
    NonFiniteInput { index: usize, value: f64 },
}
