//! Test Request Producer
//!
//! Generates and publishes synthetic scoring requests to NATS for pipeline
//! testing.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

/// Request structure matching the scoring service's expected format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScoreRequest {
    request_id: String,
    features: HashMap<String, String>,
}

/// Request generator for testing
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
    request_counter: u64,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            request_counter: 0,
        }
    }

    /// Generate a legitimate-looking scoring request
    fn generate_legitimate(&mut self) -> ScoreRequest {
        self.request_counter += 1;

        let mut features = HashMap::new();
        features.insert(
            "transaction_amount".to_string(),
            format!("{:.2}", self.rng.gen_range(10.0..500.0)),
        );
        features.insert(
            "login_attempts".to_string(),
            self.rng.gen_range(0..3).to_string(),
        );
        features.insert(
            "transaction_time".to_string(),
            self.rng.gen_range(9..22).to_string(),
        );
        features.insert("vpn_used".to_string(), "0".to_string());
        features.insert(
            "merchant_risk".to_string(),
            format!("{:.2}", self.rng.gen_range(0.0..1.0)),
        );

        ScoreRequest {
            request_id: format!("req_{:012}", self.request_counter),
            features,
        }
    }

    /// Generate a suspicious scoring request
    fn generate_suspicious(&mut self) -> ScoreRequest {
        self.request_counter += 1;

        let mut features = HashMap::new();
        features.insert(
            "transaction_amount".to_string(),
            format!("{:.2}", self.rng.gen_range(12_000.0..50_000.0)),
        );
        features.insert(
            "login_attempts".to_string(),
            self.rng.gen_range(6..15).to_string(),
        );
        features.insert(
            "transaction_time".to_string(),
            self.rng.gen_range(0..5).to_string(),
        );
        features.insert("vpn_used".to_string(), "1".to_string());
        features.insert(
            "merchant_risk".to_string(),
            format!("{:.2}", self.rng.gen_range(0.5..1.0)),
        );

        // Occasionally mangle a field to exercise the 0.0 coercion path.
        if self.rng.gen_bool(0.1) {
            features.insert("login_attempts".to_string(), "many".to_string());
        }

        ScoreRequest {
            request_id: format!("req_{:012}", self.request_counter),
            features,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_producer=info".parse()?),
        )
        .init();

    info!("Starting Test Request Producer");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("score.requests");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);
    let fraud_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.1);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        fraud_rate = fraud_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    // Connect to NATS
    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            // Continue in dry-run mode
            return run_dry_mode(count, fraud_rate, delay_ms).await;
        }
    };

    // Generate and publish requests
    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    info!("Starting to publish {} requests...", count);

    let mut legitimate_count = 0;
    let mut suspicious_count = 0;

    for i in 0..count {
        let request = if rng.gen_bool(fraud_rate) {
            suspicious_count += 1;
            generator.generate_suspicious()
        } else {
            legitimate_count += 1;
            generator.generate_legitimate()
        };

        let payload = serde_json::to_vec(&request)?;

        client.publish(subject.to_string(), payload.into()).await?;

        if (i + 1) % 10 == 0 {
            info!(
                "Published {}/{} requests ({} legitimate, {} suspicious)",
                i + 1,
                count,
                legitimate_count,
                suspicious_count
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Published {} requests ({} legitimate, {} suspicious)",
        count, legitimate_count, suspicious_count
    );

    Ok(())
}

async fn run_dry_mode(count: u64, fraud_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let request = if rng.gen_bool(fraud_rate) {
            generator.generate_suspicious()
        } else {
            generator.generate_legitimate()
        };

        let json = serde_json::to_string_pretty(&request)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample request {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
