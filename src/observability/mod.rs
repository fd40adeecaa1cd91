//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → stdout (pretty for development, JSON for production)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - `x-request-id` is attached to every request span
//! - Metrics are labelled by mount name, not raw path, to bound cardinality
//! - Metrics are off unless explicitly enabled

pub mod logging;
pub mod metrics;
