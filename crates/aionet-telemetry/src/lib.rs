//! # AIONET Telemetry
//!
//! Logging and metrics for the AIONET core.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` fmt layer with `EnvFilter`, plain or JSON
//! - **Metrics**: Prometheus counters and histograms for sealing,
//!   verification and clone verdicts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aionet_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AIONET_SERVICE_NAME` | `aionet` | Service name in log lines |
//! | `AIONET_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `AIONET_JSON_LOGS` | `false` | JSON log output |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, record_clone_verdict, record_pow_timeout, record_seal, record_verification,
    register_metrics, HistogramTimer, ARTIFACTS_SEALED, CLONE_VERDICTS, POW_ITERATIONS,
    POW_TIMEOUTS, SEAL_DURATION, VERIFICATION_FAILURES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the global log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
