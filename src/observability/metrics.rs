//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define registry metrics (requests, transactions, confirmations)
//! - Expose Prometheus-compatible metrics endpoint
//! - Track chain connectivity
//!
//! # Metrics
//! - `registry_http_requests_total` (counter): requests by method, route, status
//! - `registry_http_request_duration_seconds` (histogram): latency by method, route
//! - `registry_transactions_total` (counter): transactions by operation, outcome
//! - `registry_confirmation_seconds` (histogram): broadcast-to-receipt wall time
//! - `registry_chain_connected` (gauge): 1=reachable, 0=unreachable
//!
//! # Design Decisions
//! - Route labels use the matched template, never the raw path
//! - Transaction outcomes reuse the error taxonomy's kind strings, so
//!   dashboards and HTTP error bodies agree on vocabulary

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and its scrape endpoint.
///
/// Failure to bind is logged but not fatal: the service keeps running
/// without metrics exposition.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(
                address = %addr,
                "Metrics endpoint started"
            );
        }
        Err(e) => {
            tracing::error!(
                address = %addr,
                error = %e,
                "Failed to start metrics endpoint"
            );
        }
    }
}

/// Record one handled HTTP request.
pub fn record_http_request(method: &str, route: &str, status: u16, elapsed: Duration) {
    counter!(
        "registry_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);

    histogram!(
        "registry_http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string(),
    )
    .record(elapsed.as_secs_f64());
}

/// Record the outcome of one on-chain transaction attempt.
///
/// `outcome` is either `"confirmed"` or an error kind string.
pub fn record_transaction(operation: &str, outcome: &str) {
    counter!(
        "registry_transactions_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string(),
    )
    .increment(1);
}

/// Record how long a transaction took from broadcast to receipt.
pub fn record_confirmation_time(operation: &str, elapsed: Duration) {
    histogram!(
        "registry_confirmation_seconds",
        "operation" => operation.to_string(),
    )
    .record(elapsed.as_secs_f64());
}

/// Record whether the RPC endpoint answered the last connectivity probe.
pub fn record_chain_connectivity(connected: bool) {
    gauge!("registry_chain_connected").set(if connected { 1.0 } else { 0.0 });
}
