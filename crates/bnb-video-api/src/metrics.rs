//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;
use tracing::warn;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "bnb_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "bnb_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "bnb_http_requests_in_flight";

    // Generation metrics
    pub const GENERATIONS_TOTAL: &str = "bnb_video_generations_total";
    pub const GENERATION_DURATION_SECONDS: &str = "bnb_video_generation_duration_seconds";
    pub const POLL_ATTEMPTS: &str = "bnb_video_poll_attempts";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path).to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a finished generation request.
pub fn record_generation(outcome: &str, duration_secs: f64) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::GENERATIONS_TOTAL, &labels).increment(1);
    histogram!(names::GENERATION_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record how many status calls a video job took.
pub fn record_poll_attempts(attempts: u32) {
    histogram!(names::POLL_ATTEMPTS).record(f64::from(attempts));
}

/// Collapse unknown paths into one label.
fn sanitize_path(path: &str) -> &str {
    match path {
        "/newvideo" | "/health" | "/healthz" | "/ready" | "/metrics" => path,
        _ => "other",
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/newvideo"), "/newvideo");
        assert_eq!(sanitize_path("/healthz"), "/healthz");
        assert_eq!(sanitize_path("/newvideo/123"), "other");
        assert_eq!(sanitize_path("/wp-login.php"), "other");
    }
}
