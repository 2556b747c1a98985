//! NATS message producer for scoring outcomes

use crate::types::score::{ScoringFailure, ScoringResult};
use anyhow::Result;
use async_nats::Client;
use tracing::debug;

/// Producer for publishing scoring outcomes to NATS
#[derive(Clone)]
pub struct ResultProducer {
    client: Client,
    subject: String,
}

impl ResultProducer {
    /// Create a new result producer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Publish a scoring result
    pub async fn publish(&self, result: &ScoringResult) -> Result<()> {
        let payload = serde_json::to_vec(result)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(
            result_id = %result.result_id,
            request_id = %result.request_id,
            verdict = ?result.verdict,
            probability = result.probability,
            "Published scoring result"
        );

        Ok(())
    }

    /// Publish a scoring failure.
    ///
    /// Failures go to the same subject as results but with a distinct shape,
    /// so callers can never mistake an internal error for a verdict.
    pub async fn publish_failure(&self, failure: &ScoringFailure) -> Result<()> {
        let payload = serde_json::to_vec(failure)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(
            request_id = %failure.request_id,
            error = %failure.error,
            "Published scoring failure"
        );

        Ok(())
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[cfg(test)]
mod tests {
    // Integration tests would require a running NATS server
}
