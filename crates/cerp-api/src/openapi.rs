//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Contract ERP Agent API",
        version = "0.1.0",
        description = "Contract extraction into three-phase milestone plans and evidence-driven milestone tracking.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::service::root,
        crate::routes::service::agent_status,
        crate::routes::service::metrics,
        crate::routes::contracts::analyze_contract,
        crate::routes::contracts::check_milestone,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::service::ServiceInfo,
        crate::routes::service::AgentState,
        crate::routes::service::AgentStatus,
        crate::routes::contracts::ContractUploadForm,
        crate::routes::contracts::MilestoneCheckRequest,
        crate::routes::contracts::MilestoneCheckResponse,
    )),
    tags(
        (name = "contracts", description = "Contract analysis and milestone evidence"),
        (name = "service", description = "Service status and metrics"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
