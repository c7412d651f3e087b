//! # Prometheus Metrics
//!
//! Installs the global `metrics` recorder backed by the Prometheus exporter
//! and counts HTTP requests by method, route, and status class. Workflow
//! counters (`cerp_evidence_evaluations_total`,
//! `cerp_phase_transitions_total`) are emitted from `cerp-agentic` and land
//! in the same recorder.

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder.
///
/// Returns `None` when a recorder is already installed (for example by a
/// second app instance in the same process); `/metrics` then answers 503.
pub fn install_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            describe_metrics();
            Some(handle)
        }
        Err(e) => {
            tracing::warn!(error = %e, "prometheus recorder not installed");
            None
        }
    }
}

fn describe_metrics() {
    describe_counter!("cerp_http_requests_total", "HTTP requests by route and status class");
    describe_counter!(
        "cerp_evidence_evaluations_total",
        "Evidence evaluations by decision"
    );
    describe_counter!(
        "cerp_phase_transitions_total",
        "Contract phase transitions by source and target phase"
    );
}

/// Middleware that counts requests by method, matched route, and status class.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let status = match response.status().as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    };
    counter!(
        "cerp_http_requests_total",
        "method" => method,
        "route" => route,
        "status" => status
    )
    .increment(1);

    response
}
