//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, status, mount
//! - `http_request_duration_seconds` (histogram): latency by method, mount

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::MountIndex;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("http_requests_total", "Total HTTP requests handled");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request latency in seconds"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, mount: &'static str, start_time: Instant) {
    let elapsed = start_time.elapsed().as_secs_f64();

    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "mount" => mount
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "mount" => mount
    )
    .record(elapsed);
}

/// Middleware recording every request against the mount that owns its path.
pub async fn track_requests(
    State(index): State<Arc<MountIndex>>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let mount = index.lookup(request.uri().path()).unwrap_or("none");

    let response = next.run(request).await;

    record_request(&method, response.status().as_u16(), mount, start_time);
    response
}
