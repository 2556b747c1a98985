//! Type definitions for the fraud scoring service

pub mod request;
pub mod score;

pub use request::ScoreRequest;
pub use score::{ScoringFailure, ScoringResult, Verdict};
