//! # Service Status Endpoints
//!
//! Banner, agent activity, and Prometheus scrape endpoint.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Service banner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
}

/// Whether any agent is currently processing evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AgentState {
    Idle,
    Busy,
}

/// Agent activity snapshot.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AgentStatus {
    pub state: AgentState,
    /// Evidence checks currently in flight.
    pub agents_active: usize,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/agent-status", get(agent_status))
        .route("/metrics", get(metrics))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /: Service banner.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is online", body = ServiceInfo)),
    tag = "service"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "AI Microservice Online".to_string(),
        service: "Agentic ERP".to_string(),
    })
}

/// GET /agent-status: Number of evidence checks in flight.
#[utoipa::path(
    get,
    path = "/agent-status",
    responses((status = 200, description = "Agent activity", body = AgentStatus)),
    tag = "service"
)]
pub async fn agent_status(State(state): State<AppState>) -> Json<AgentStatus> {
    let agents_active = state.activity.active();
    Json(AgentStatus {
        state: if agents_active == 0 {
            AgentState::Idle
        } else {
            AgentState::Busy
        },
        agents_active,
    })
}

/// GET /metrics: Prometheus text exposition.
#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Prometheus metrics", content_type = "text/plain"),
        (status = 503, description = "Metrics recorder not installed", body = crate::error::ErrorBody),
    ),
    tag = "service"
)]
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("metrics recorder not installed".into()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
