//! Performance metrics and statistics tracking for the scoring service.

use crate::types::score::Verdict;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for scoring throughput and outcomes.
pub struct PipelineMetrics {
    /// Total requests scored successfully
    pub requests_scored: AtomicU64,
    /// Fraud verdicts returned
    pub fraud_verdicts: AtomicU64,
    /// Normal verdicts returned
    pub normal_verdicts: AtomicU64,
    /// Requests that failed with an internal error
    pub internal_errors: AtomicU64,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Probability distribution buckets (percentage deciles)
    probability_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PipelineMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            requests_scored: AtomicU64::new(0),
            fraud_verdicts: AtomicU64::new(0),
            normal_verdicts: AtomicU64::new(0),
            internal_errors: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            probability_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a scored request.
    ///
    /// `probability` is the percentage reported to the caller (0-100).
    pub fn record_scored(&self, processing_time: Duration, verdict: Verdict, probability: f64) {
        self.requests_scored.fetch_add(1, Ordering::Relaxed);

        match verdict {
            Verdict::Fraud => self.fraud_verdicts.fetch_add(1, Ordering::Relaxed),
            Verdict::Normal => self.normal_verdicts.fetch_add(1, Ordering::Relaxed),
        };

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only last 10000 for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = ((probability / 10.0).max(0.0) as usize).min(9);
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record an internal scoring error
    pub fn record_error(&self) {
        self.internal_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = self.processing_times.read().unwrap();
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (requests per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.requests_scored.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get probability distribution (percentage deciles)
    pub fn get_probability_distribution(&self) -> [u64; 10] {
        *self.probability_buckets.read().unwrap()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let scored = self.requests_scored.load(Ordering::Relaxed);
        let fraud = self.fraud_verdicts.load(Ordering::Relaxed);
        let normal = self.normal_verdicts.load(Ordering::Relaxed);
        let errors = self.internal_errors.load(Ordering::Relaxed);
        let fraud_rate = if scored > 0 {
            (fraud as f64 / scored as f64) * 100.0
        } else {
            0.0
        };

        let processing = self.get_processing_stats();
        let throughput = self.get_throughput();
        let distribution = self.get_probability_distribution();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║             FRAUD SCORING SERVICE - METRICS SUMMARY          ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Requests Scored: {:>8}  │  Throughput: {:>6.1} req/s       ║",
            scored, throughput
        );
        info!(
            "║ Fraud: {:>8} ({:>5.1}%)  │  Normal: {:>8}  │  Errors: {:>4} ║",
            fraud, fraud_rate, normal, errors
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Processing Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5} ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Probability Distribution (%):                                ║");
        let total: u64 = distribution.iter().sum();
        for (i, &count) in distribution.iter().enumerate() {
            let pct = if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            let bar_len = (pct / 2.0) as usize;
            let bar: String = "█".repeat(bar_len.min(20));
            info!(
                "║   {:>3}-{:>3}: {:>6} ({:>5.1}%) {}",
                i * 10,
                (i + 1) * 10,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<PipelineMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<PipelineMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
