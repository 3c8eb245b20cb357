//! Prometheus metrics for the fetch client.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "kalshi_http_request_latency_ms";
/// Requests issued counter metric name.
pub const METRIC_REQUESTS: &str = "kalshi_requests_total";
/// Failed requests counter metric name.
pub const METRIC_REQUESTS_FAILED: &str = "kalshi_requests_failed_total";
/// Rate-limited responses counter metric name.
pub const METRIC_RATE_LIMITED: &str = "kalshi_rate_limited_total";
/// Rate-limit retries counter metric name.
pub const METRIC_RETRIES: &str = "kalshi_retries_total";
/// Pages fetched during pagination counter metric name.
pub const METRIC_PAGES_FETCHED: &str = "kalshi_pages_fetched_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "Kalshi API request latency in milliseconds"
    );

    describe_counter!(METRIC_REQUESTS, "Total number of Kalshi API requests issued");
    describe_counter!(
        METRIC_REQUESTS_FAILED,
        "Total number of Kalshi API requests that failed"
    );
    describe_counter!(
        METRIC_RATE_LIMITED,
        "Total number of rate-limited (HTTP 429) responses"
    );
    describe_counter!(METRIC_RETRIES, "Total number of rate-limit retries");
    describe_counter!(
        METRIC_PAGES_FETCHED,
        "Total number of pages fetched while paginating list endpoints"
    );

    debug!("Metrics initialized");
}

/// Record request latency for an endpoint.
pub fn record_http_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string())
        .record(latency_ms);
}

/// Increment requests issued counter.
pub fn inc_requests() {
    counter!(METRIC_REQUESTS).increment(1);
}

/// Increment failed requests counter.
pub fn inc_requests_failed() {
    counter!(METRIC_REQUESTS_FAILED).increment(1);
}

/// Increment rate-limited responses counter.
pub fn inc_rate_limited() {
    counter!(METRIC_RATE_LIMITED).increment(1);
}

/// Increment retry counter.
pub fn inc_retries() {
    counter!(METRIC_RETRIES).increment(1);
}

/// Increment pages fetched counter.
pub fn inc_pages_fetched() {
    counter!(METRIC_PAGES_FETCHED).increment(1);
}
