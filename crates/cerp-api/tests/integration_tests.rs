//! # Integration Tests for cerp-api
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`: health
//! checks, contract analysis with and without an extractor, milestone
//! evidence checks, error mapping, agent status, metrics, and OpenAPI.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use cerp_agentic::{ContractExtractor, ExtractionError, ExtractionService};
use cerp_api::state::{AppConfig, AppState};
use cerp_core::{fallback_contract, Contract};

/// Helper: build the test app with default config and no collaborators.
fn test_app() -> axum::Router {
    cerp_api::app(AppState::new())
}

fn strict_app() -> axum::Router {
    let config = AppConfig {
        strict_phases: true,
        ..AppConfig::default()
    };
    cerp_api::app(AppState::with_config(config, ExtractionService::new()))
}

async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_text(uri: &str, text: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(text.to_string()))
        .unwrap()
}

/// The fallback contract with its first phase opened, as
/// `/analyze-contract` returns it.
fn active_contract() -> Contract {
    let mut c = fallback_contract();
    c.activate_initial_phase();
    c
}

// -- Health Checks ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_check() {
    let response = test_app().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_check() {
    let response = test_app().oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Service ------------------------------------------------------------------

#[tokio::test]
async fn test_root_banner() {
    let response = test_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"status": "AI Microservice Online", "service": "Agentic ERP"})
    );
}

#[tokio::test]
async fn test_agent_status_idle() {
    let response = test_app().oneshot(get("/agent-status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"state": "Idle", "agents_active": 0})
    );
}

#[tokio::test]
async fn test_metrics_without_recorder_is_503() {
    let response = test_app().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_openapi_lists_routes() {
    let response = test_app().oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    let paths = spec["paths"].as_object().unwrap();
    for p in ["/", "/analyze-contract", "/check-milestone", "/agent-status", "/metrics"] {
        assert!(paths.contains_key(p), "missing path {p}");
    }
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

// -- Contract analysis --------------------------------------------------------

#[tokio::test]
async fn test_analyze_without_extractor_returns_fallback() {
    let response = test_app()
        .oneshot(post_text("/analyze-contract?filename=servicio.pdf", "CONTRATO ..."))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["contract_id"], "MOCK-001");
    assert_eq!(body["parties"], json!(["Empresa A", "Proveedor B"]));
    assert_eq!(body["current_phase"], "INITIATION");
    assert_eq!(body["phases"][0]["status"], "ACTIVE");
    assert_eq!(body["phases"][0]["actions"][0]["id"], "ACT-01");
}

#[tokio::test]
async fn test_analyze_rejects_empty_body() {
    let response = test_app()
        .oneshot(post_text("/analyze-contract", "   "))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

struct RecordingExtractor {
    inputs: Mutex<Vec<String>>,
}

#[async_trait]
impl ContractExtractor for RecordingExtractor {
    async fn extract(&self, raw_text: &str, _: &[String]) -> Result<Contract, ExtractionError> {
        self.inputs.lock().unwrap().push(raw_text.to_string());
        let mut c = fallback_contract();
        c.contract_id = "EXT-7".into();
        c.title = Some("Suministro de equipos".into());
        Ok(c)
    }
}

#[tokio::test]
async fn test_analyze_uses_configured_extractor() {
    let extractor = Arc::new(RecordingExtractor {
        inputs: Mutex::new(Vec::new()),
    });
    let service = ExtractionService::new().with_extractor(extractor.clone());
    let app = cerp_api::app(AppState::with_config(AppConfig::default(), service));

    let response = app
        .oneshot(post_text("/analyze-contract?filename=equipos.pdf", "Cláusula 1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["contract_id"], "EXT-7");
    assert_eq!(body["title"], "Suministro de equipos");

    let inputs = extractor.inputs.lock().unwrap();
    assert_eq!(inputs.len(), 1);
    assert!(inputs[0].starts_with("Document: equipos.pdf"));
    assert!(inputs[0].ends_with("Cláusula 1"));
}

fn post_multipart(uri: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, filename, content) in parts {
        body.push_str("--XBOUNDARY\r\n");
        match filename {
            Some(file) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\n\
                 Content-Type: text/plain\r\n\r\n"
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str("--XBOUNDARY--\r\n");
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=XBOUNDARY",
        )
        .body(Body::from(body))
        .unwrap()
}

fn recording_app() -> (axum::Router, Arc<RecordingExtractor>) {
    let extractor = Arc::new(RecordingExtractor {
        inputs: Mutex::new(Vec::new()),
    });
    let service = ExtractionService::new().with_extractor(extractor.clone());
    let app = cerp_api::app(AppState::with_config(AppConfig::default(), service));
    (app, extractor)
}

#[tokio::test]
async fn test_analyze_multipart_upload_uses_part_filename() {
    let (app, extractor) = recording_app();

    let response = app
        .oneshot(post_multipart(
            "/analyze-contract",
            &[
                ("note", None, "ignorar"),
                ("file", Some("obra.txt"), "Contrato de obra civil"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["contract_id"], "EXT-7");

    let inputs = extractor.inputs.lock().unwrap();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0], "Document: obra.txt\n\nContrato de obra civil");
    assert!(!inputs[0].contains("XBOUNDARY"));
    assert!(!inputs[0].contains("ignorar"));
}

#[tokio::test]
async fn test_analyze_multipart_part_filename_beats_query() {
    let (app, extractor) = recording_app();

    let response = app
        .oneshot(post_multipart(
            "/analyze-contract?filename=otro.pdf",
            &[("file", Some("obra.txt"), "Contrato de obra civil")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let inputs = extractor.inputs.lock().unwrap();
    assert!(inputs[0].starts_with("Document: obra.txt"));
}

#[tokio::test]
async fn test_analyze_multipart_without_file_field_is_400() {
    let (app, extractor) = recording_app();

    let response = app
        .oneshot(post_multipart(
            "/analyze-contract",
            &[("document", Some("obra.txt"), "Contrato de obra civil")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("\"file\""));
    assert!(extractor.inputs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_analyze_multipart_blank_file_is_400() {
    let (app, _) = recording_app();

    let response = app
        .oneshot(post_multipart(
            "/analyze-contract",
            &[("file", Some("vacio.txt"), "   ")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_plain_text_still_accepted() {
    let (app, extractor) = recording_app();

    let response = app
        .oneshot(post_text("/analyze-contract", "Cláusula única"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let inputs = extractor.inputs.lock().unwrap();
    assert_eq!(*inputs, vec!["Cláusula única".to_string()]);
}

// -- Milestone checks ---------------------------------------------------------

#[tokio::test]
async fn test_check_milestone_met_advances_phase() {
    let request = json!({
        "contract": active_contract(),
        "action_id": "ACT-01",
        "evidence_text": "Acta firmada, ver https://docs.example/acta.pdf"
    });
    let response = test_app()
        .oneshot(post_json("/check-milestone", &request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["agent_response"], "Milestone COMPLETED based on evidence.");
    assert_eq!(body["decision"], "MET");
    assert_eq!(body["transition"], json!({"from": "INITIATION", "to": "EXECUTION"}));

    let updated = &body["updated_contract"];
    assert_eq!(updated["current_phase"], "EXECUTION");
    assert_eq!(updated["phases"][0]["status"], "COMPLETED");
    assert_eq!(updated["phases"][1]["status"], "ACTIVE");
    let action = &updated["phases"][0]["actions"][0];
    assert_eq!(action["status"], "completed");
    assert_eq!(action["evidence"][0]["url"], "https://docs.example/acta.pdf");
}

#[tokio::test]
async fn test_check_milestone_insufficient_keeps_contract() {
    let contract = active_contract();
    let request = json!({
        "contract": contract,
        "action_id": "ACT-01",
        "evidence_text": "still pending"
    });
    let response = test_app()
        .oneshot(post_json("/check-milestone", &request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body["agent_response"],
        "Evidence insufficient. Please provide more details."
    );
    assert!(body.get("transition").is_none());
    let updated: Contract = serde_json::from_value(body["updated_contract"].clone()).unwrap();
    assert_eq!(updated, contract);
}

#[tokio::test]
async fn test_check_milestone_unknown_action_is_404() {
    let request = json!({
        "contract": active_contract(),
        "action_id": "ACT-99",
        "evidence_text": "done"
    });
    let response = test_app()
        .oneshot(post_json("/check-milestone", &request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "Action ID not found in contract");
}

#[tokio::test]
async fn test_check_milestone_missing_evidence_reports_missing_input() {
    let request = json!({
        "contract": active_contract(),
        "action_id": "ACT-01"
    });
    let response = test_app()
        .oneshot(post_json("/check-milestone", &request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["agent_response"],
        "No action or evidence provided"
    );
}

#[tokio::test]
async fn test_check_milestone_malformed_json_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/check-milestone")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"contract\": "))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_check_milestone_accepts_legacy_labels() {
    let request = json!({
        "contract": {
            "contract_id": "LEG-1",
            "parties": ["A", "B"],
            "current_phase": "INICIO",
            "phases": [
                {"name": "INICIO", "status": "ACTIVE", "actions": [
                    {"id": "L-1", "description": "Kick-off", "criteria": "Acta", "status": "PENDING", "evidence": null}
                ]},
                {"name": "EJECUCION", "actions": []},
                {"name": "CIERRE", "actions": []}
            ]
        },
        "action_id": "L-1",
        "evidence_text": "Todo completo"
    });
    let response = test_app()
        .oneshot(post_json("/check-milestone", &request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = &body_json(response).await["updated_contract"];
    assert_eq!(updated["current_phase"], "EXECUTION");
    assert_eq!(updated["phases"][0]["name"], "INITIATION");
}

#[tokio::test]
async fn test_strict_mode_rejects_inconsistent_contract() {
    // current_phase names INITIATION but no phase carries that name.
    let mut contract = active_contract();
    contract.phases[0].name = cerp_core::PhaseName::Execution;
    contract.phases.remove(1);
    let request = json!({
        "contract": contract,
        "action_id": "ACT-01",
        "evidence_text": "done"
    });

    let lenient = test_app()
        .oneshot(post_json("/check-milestone", &request))
        .await
        .unwrap();
    assert_eq!(lenient.status(), StatusCode::OK);
    let body = body_json(lenient).await;
    assert_eq!(body["decision"], "MET");
    assert!(body.get("transition").is_none());
    assert_eq!(body["updated_contract"]["current_phase"], "INITIATION");

    let strict = strict_app()
        .oneshot(post_json("/check-milestone", &request))
        .await
        .unwrap();
    assert_eq!(strict.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(strict).await["error"]["code"],
        "INCONSISTENT_CONTRACT"
    );
}
