//! Metrics collection and exposition.
//!
//! # Metrics
//! - `verifier_requests_total` (counter): edge requests by method, status
//! - `verifier_request_duration_seconds` (histogram): edge latency
//! - `verifier_verifications_total` (counter): verification outcomes
//! - `verifier_verification_duration_seconds` (histogram): time spent per verification
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one request answered at the edge.
pub fn record_request(method: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "verifier_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("verifier_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one verification attempt.
pub fn record_verification(outcome: &'static str, start: Instant) {
    ::metrics::counter!("verifier_verifications_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("verifier_verification_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
