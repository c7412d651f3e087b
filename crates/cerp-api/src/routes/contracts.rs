//! # Contract Endpoints
//!
//! `/analyze-contract` turns raw contract text into a structured contract
//! (or the fallback skeleton when extraction is unavailable).
//! `/check-milestone` applies evidence to one action of a caller-supplied
//! contract snapshot and returns the updated snapshot.
//!
//! Neither endpoint stores contracts. Concurrent `/check-milestone` calls
//! for the same `contract_id` are serialized through [`ContractLocks`].
//!
//! [`ContractLocks`]: crate::state::ContractLocks

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use cerp_core::Contract;
use cerp_state::{Decision, PhaseTransition};

use crate::error::AppError;
use crate::extractors::{extract_json, ContractUpload};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Query parameters for `/analyze-contract`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyzeParams {
    /// Original document name, used as context for extraction. A file
    /// name on the multipart part takes precedence.
    pub filename: Option<String>,
}

/// Multipart form accepted by `/analyze-contract`.
#[derive(Debug, ToSchema)]
pub struct ContractUploadForm {
    /// Contract document (UTF-8 text).
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Evidence submission against one action of a contract snapshot.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MilestoneCheckRequest {
    /// Current contract snapshot.
    #[schema(value_type = Object)]
    pub contract: Contract,
    /// Id of the action the evidence is for.
    pub action_id: String,
    /// Free-text evidence. Blank evidence is reported as missing input.
    #[serde(default)]
    pub evidence_text: String,
}

/// Result of an evidence submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MilestoneCheckResponse {
    /// Always `"success"` for a processed submission.
    pub status: String,
    /// Human-readable evaluation message.
    pub agent_response: String,
    #[schema(value_type = String, example = "MET")]
    pub decision: Decision,
    /// Phase closed by this submission, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub transition: Option<PhaseTransition>,
    /// Contract snapshot after evaluation and phase advancement.
    #[schema(value_type = Object)]
    pub updated_contract: Contract,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze-contract", post(analyze_contract))
        .route("/check-milestone", post(check_milestone))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /analyze-contract: Extract a structured contract from raw text.
///
/// Never fails on collaborator errors: an unconfigured or failing
/// extractor yields the fallback contract.
#[utoipa::path(
    post,
    path = "/analyze-contract",
    params(AnalyzeParams),
    request_body(
        content(
            (ContractUploadForm = "multipart/form-data"),
            (String = "text/plain"),
        ),
        description = "Contract document as a `file` upload, or raw contract text"
    ),
    responses(
        (status = 200, description = "Extracted (or fallback) contract"),
        (status = 400, description = "Empty or non-UTF-8 document, or no `file` part", body = crate::error::ErrorBody),
    ),
    tag = "contracts"
)]
pub async fn analyze_contract(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
    upload: ContractUpload,
) -> Result<Json<Contract>, AppError> {
    let ContractUpload { filename, text } = upload;
    let filename = filename.or(params.filename);
    let input = match filename.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => {
            tracing::info!(filename = %name, chars = text.len(), "analyzing contract");
            format!("Document: {name}\n\n{text}")
        }
        _ => {
            tracing::info!(chars = text.len(), "analyzing contract");
            text
        }
    };

    let _busy = state.activity.enter();
    let contract = state.extraction.extract(&input).await;
    Ok(Json(contract))
}

/// POST /check-milestone: Evaluate evidence and advance the contract.
#[utoipa::path(
    post,
    path = "/check-milestone",
    request_body = MilestoneCheckRequest,
    responses(
        (status = 200, description = "Evidence processed", body = MilestoneCheckResponse),
        (status = 400, description = "Malformed body or inconsistent contract", body = crate::error::ErrorBody),
        (status = 404, description = "Action ID not found in contract", body = crate::error::ErrorBody),
    ),
    tag = "contracts"
)]
pub async fn check_milestone(
    State(state): State<AppState>,
    body: Result<Json<MilestoneCheckRequest>, JsonRejection>,
) -> Result<Json<MilestoneCheckResponse>, AppError> {
    let req = extract_json(body)?;
    let mut contract = req.contract;

    let _busy = state.activity.enter();
    let _lock = state.locks.acquire(&contract.contract_id).await;

    let report = state
        .workflow
        .process_evidence(&mut contract, &req.action_id, &req.evidence_text)?;

    Ok(Json(MilestoneCheckResponse {
        status: "success".to_string(),
        agent_response: report.agent_response,
        decision: report.decision,
        transition: report.transition,
        updated_contract: contract,
    }))
}
