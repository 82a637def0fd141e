//! Prometheus metrics for AIONET.
//!
//! All metrics follow the naming convention: `aionet_<metric>_<unit>`
//!
//! Core crates stay metric-free; the runtime records these around the calls
//! it makes.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, Histogram, HistogramOpts, HistogramVec, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Sealed artifacts by kind (transaction, message, block)
    pub static ref ARTIFACTS_SEALED: CounterVec = CounterVec::new(
        Opts::new("aionet_artifacts_sealed_total", "Artifacts sealed with proof-of-work"),
        &["kind"]
    ).expect("metric creation failed");

    /// Nonces tried per successful seal
    pub static ref POW_ITERATIONS: HistogramVec = HistogramVec::new(
        HistogramOpts::new("aionet_pow_iterations", "Nonces tried per successful seal")
            .buckets(exponential_buckets(1.0, 4.0, 12).expect("valid buckets")),
        &["kind"]
    ).expect("metric creation failed");

    /// Wall time per seal
    pub static ref SEAL_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("aionet_seal_duration_seconds", "Time spent sealing an artifact")
            .buckets(exponential_buckets(0.0001, 2.0, 16).expect("valid buckets")),
        &["kind"]
    ).expect("metric creation failed");

    /// Proof-of-work searches that ran out of time or budget
    pub static ref POW_TIMEOUTS: CounterVec = CounterVec::new(
        Opts::new("aionet_pow_timeouts_total", "Proof-of-work searches abandoned"),
        &["kind"]
    ).expect("metric creation failed");

    /// Verifications that returned false, by kind
    pub static ref VERIFICATION_FAILURES: CounterVec = CounterVec::new(
        Opts::new("aionet_verification_failures_total", "Failed verifications"),
        &["kind"]
    ).expect("metric creation failed");

    /// Clone verdicts (cloned, clean)
    pub static ref CLONE_VERDICTS: CounterVec = CounterVec::new(
        Opts::new("aionet_clone_verdicts_total", "Clone detection verdicts"),
        &["verdict"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Fails if called twice in one process.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(ARTIFACTS_SEALED.clone()),
        Box::new(POW_ITERATIONS.clone()),
        Box::new(SEAL_DURATION.clone()),
        Box::new(POW_TIMEOUTS.clone()),
        Box::new(VERIFICATION_FAILURES.clone()),
        Box::new(CLONE_VERDICTS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }
    Ok(())
}

/// Encode all registered metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Record a successful seal.
pub fn record_seal(kind: &str, iterations: u64) {
    ARTIFACTS_SEALED.with_label_values(&[kind]).inc();
    POW_ITERATIONS
        .with_label_values(&[kind])
        .observe(iterations as f64);
}

/// Record an abandoned proof-of-work search.
pub fn record_pow_timeout(kind: &str) {
    POW_TIMEOUTS.with_label_values(&[kind]).inc();
}

/// Record a verification outcome. Only failures are counted.
pub fn record_verification(kind: &str, ok: bool) {
    if !ok {
        VERIFICATION_FAILURES.with_label_values(&[kind]).inc();
    }
}

/// Record a clone verdict.
pub fn record_clone_verdict(is_cloned: bool) {
    let verdict = if is_cloned { "cloned" } else { "clean" };
    CLONE_VERDICTS.with_label_values(&[verdict]).inc();
}
