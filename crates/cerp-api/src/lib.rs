//! # cerp-api: Axum API Service for the Contract ERP
//!
//! HTTP boundary around the agentic milestone workflow. Contracts are not
//! stored: every call carries the caller's snapshot and returns the result.
//!
//! ## API Surface
//!
//! | Route                | Module                 | Purpose                          |
//! |----------------------|------------------------|----------------------------------|
//! | `GET /`              | [`routes::service`]    | Service banner                   |
//! | `POST /analyze-contract` | [`routes::contracts`] | Text → structured contract    |
//! | `POST /check-milestone`  | [`routes::contracts`] | Evidence → updated contract   |
//! | `GET /agent-status`  | [`routes::service`]    | In-flight evidence checks        |
//! | `GET /metrics`       | [`routes::service`]    | Prometheus exposition            |
//! | `GET /openapi.json`  | [`openapi`]            | Generated OpenAPI spec           |
//! | `GET /health/*`      | this module            | Liveness and readiness checks    |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::http::HeaderValue;
use axum::middleware::from_fn;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let api = Router::new()
        .merge(routes::service::router())
        .merge(routes::contracts::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api).layer(cors)
}

/// Any origin when `origins` is empty; otherwise only the listed origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Liveness check: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
