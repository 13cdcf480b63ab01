//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (dispatch counters, latency histogram)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (path, page, outcome) on every dispatch event
//! - Request ID attached by the HTTP layer and visible in trace spans
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
