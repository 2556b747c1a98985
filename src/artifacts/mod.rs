//! Pre-trained model artifacts: vectorizer schema, scaler, classifier.

pub mod classifier;
pub mod loader;
pub mod scaler;
pub mod vectorizer;

pub use classifier::{LinearClassifier, Prediction};
pub use loader::ModelArtifacts;
pub use scaler::Scaler;
pub use vectorizer::Vectorizer;
