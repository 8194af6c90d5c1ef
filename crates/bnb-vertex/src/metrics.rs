//! Outbound Vertex request metrics.
//!
//! - Request counters by operation and status
//! - Latency histograms

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total Vertex requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "vertex_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "vertex_latency_seconds";
}

/// Record metrics for a completed Vertex request.
///
/// `status` is 0 when no HTTP response was received.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::REQUESTS_TOTAL.contains("requests"));
        assert!(names::LATENCY_SECONDS.contains("latency"));
    }
}
