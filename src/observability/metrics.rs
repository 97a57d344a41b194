//! Metrics collection and exposition.
//!
//! # Metrics
//! - `harness_dispatch_total` (counter): dispatches by method, status, route
//! - `harness_dispatch_duration_seconds` (histogram): lookup plus response time
//! - `harness_route_not_found_total` (counter): misses by method
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exposition only when enabled in config
//! - Labelled by route pattern, never by request path, so the series set is
//!   bounded by the size of the route table

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Label used for requests no route matched.
pub const NO_ROUTE: &str = "none";

/// Record one dispatched request. `route` is the matched route as listed
/// (`GET /method_test/:action(.:format)`), or [`NO_ROUTE`] for misses.
pub fn record_dispatch(method: &str, status: u16, route: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("route", route.to_string()),
    ];
    metrics::counter!("harness_dispatch_total", &labels).increment(1);
    metrics::histogram!("harness_dispatch_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());

    if status == 404 {
        metrics::counter!("harness_route_not_found_total", "method" => method.to_string())
            .increment(1);
    }
}
