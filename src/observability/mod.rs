//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (`customer_id`, `request_id`) over interpolated text
//! - Request ID flows through the trace span of every request
//! - Metrics are labelled by matched route, not raw path, to bound cardinality

pub mod logging;
pub mod metrics;
