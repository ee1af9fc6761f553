//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Scrape path produces:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (exposition text for the scrape response)
//!
//! Consumers:
//!     → Log aggregation (stdout, text or JSON)
//!     → Prometheus scrape of /metrics
//! ```

pub mod logging;
pub mod metrics;

pub use logging::LogFormat;
pub use metrics::MetricsRenderer;
