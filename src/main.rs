//! Fraud Scoring Service - Main Entry Point
//!
//! Consumes scoring requests from NATS, runs the scoring pipeline, and
//! publishes results (or distinguishable failures) back to NATS.

use anyhow::Result;
use fraud_scorer::{
    config::AppConfig,
    consumer::RequestConsumer,
    metrics::{MetricsReporter, PipelineMetrics},
    pipeline::ScoringPipeline,
    producer::ResultProducer,
    ModelArtifacts, ScoreRequest, ScoringFailure,
};
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fraud_scorer=info".parse()?),
        )
        .init();

    info!("Starting Fraud Scoring Service");

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");

    // Load and validate the artifact triple. Any failure here is fatal:
    // the process must not serve traffic with a partially loaded model.
    let artifacts = Arc::new(ModelArtifacts::load_from_dir(&config.artifacts.dir)?);
    info!(
        features = artifacts.vectorizer.dimension(),
        "Artifact triple validated"
    );

    let pipeline = ScoringPipeline::new(artifacts);

    // Initialize metrics
    let metrics = Arc::new(PipelineMetrics::new());

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    // Initialize consumer and producer
    let consumer = RequestConsumer::new(client.clone(), &config.nats.request_subject);
    let producer = Arc::new(ResultProducer::new(client.clone(), &config.nats.result_subject));

    // Parallel processing configuration
    let num_workers = config.pipeline.workers;
    info!(
        "Starting request processing loop with {} parallel workers",
        num_workers
    );
    info!("Listening on subject: {}", config.nats.request_subject);
    info!("Publishing results to: {}", config.nats.result_subject);

    // Semaphore to limit concurrent processing
    let semaphore = Arc::new(Semaphore::new(num_workers));
    let processed_count = Arc::new(AtomicU64::new(0));

    // Start metrics reporter (prints summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Process scoring requests in parallel
    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        // Acquire permit (limits concurrent tasks)
        let permit = semaphore.clone().acquire_owned().await.unwrap();

        // Clone shared resources for the spawned task
        let pipeline = pipeline.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();
        let processed_count = processed_count.clone();

        // Spawn task to score this request
        tokio::spawn(async move {
            let start_time = Instant::now();

            match serde_json::from_slice::<ScoreRequest>(&message.payload) {
                Ok(request) => {
                    let request_id = request.request_id.clone();
                    let record = request.to_record();

                    match pipeline.score(&request_id, &record) {
                        Ok(result) => {
                            let processing_time = start_time.elapsed();

                            metrics.record_scored(
                                processing_time,
                                result.verdict,
                                result.probability,
                            );

                            if let Err(e) = producer.publish(&result).await {
                                error!(
                                    request_id = %request_id,
                                    error = %e,
                                    "Failed to publish scoring result"
                                );
                            } else {
                                debug!(
                                    request_id = %request_id,
                                    verdict = ?result.verdict,
                                    probability = result.probability,
                                    processing_time_us = processing_time.as_micros(),
                                    "Scoring result published"
                                );
                            }

                            let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;

                            // Log progress every 100 requests
                            if count % 100 == 0 {
                                let throughput = metrics.get_throughput();
                                let processing_stats = metrics.get_processing_stats();
                                info!(
                                    processed = count,
                                    throughput = format!("{:.1} req/s", throughput),
                                    avg_latency_us = processing_stats.mean_us,
                                    "Processing milestone"
                                );
                            }
                        }
                        Err(e) => {
                            // Internal error: the caller gets a failure
                            // message, never a defaulted verdict.
                            metrics.record_error();
                            error!(
                                request_id = %request_id,
                                error = %e,
                                "Scoring failed"
                            );

                            let failure = ScoringFailure::new(request_id.clone(), e.to_string());
                            if let Err(e) = producer.publish_failure(&failure).await {
                                error!(
                                    request_id = %request_id,
                                    error = %e,
                                    "Failed to publish scoring failure"
                                );
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to deserialize scoring request");
                }
            }

            // Release permit when done
            drop(permit);
        });
    }

    // Print final summary
    info!("Scoring service shutting down...");
    metrics.print_summary();

    Ok(())
}
