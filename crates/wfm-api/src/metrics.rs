// ============================================================================
// WFM API - Prometheus Metrics
// File: crates/wfm-api/src/metrics.rs
// Description: Request counters/histograms and the text exposition endpoint
// ============================================================================

use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "wfm_http_requests_total",
        "Number of HTTP requests handled",
        &["method", "path", "status"]
    )
    .expect("metric registration")
});

pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "wfm_http_request_duration_seconds",
        "HTTP request latency",
        &["method", "path"]
    )
    .expect("metric registration")
});

/// `GET /metrics` in Prometheus text exposition format.
pub async fn metrics_handler() -> Result<String, StatusCode> {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&families, &mut buffer)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exposition_includes_registered_metrics() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/health", "200"])
            .inc();
        let body = metrics_handler().await.unwrap();
        assert!(body.contains("wfm_http_requests_total"));
    }
}
