//! Metrics collection and exposition.
//!
//! # Metrics
//! - `routes_dispatch_total` (counter): requests by outcome
//! - `routes_dispatch_duration_seconds` (histogram): time spent in dispatch,
//!   including the page application
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until an
//!   exporter is installed
//! - The Prometheus exporter serves its own scrape endpoint

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    metrics::describe_counter!("routes_dispatch_total", "Dispatched requests by outcome");
    metrics::describe_histogram!(
        "routes_dispatch_duration_seconds",
        "Time spent dispatching a request"
    );

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one dispatched request.
pub fn record_dispatch(outcome: &'static str, start: Instant) {
    metrics::counter!("routes_dispatch_total", "outcome" => outcome).increment(1);
    metrics::histogram!("routes_dispatch_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
