//! # cerp-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the contract ERP agent.
//! Binds to configurable port (default 8000).

use std::sync::Arc;

use cerp_agentic::ExtractionService;
use cerp_api::state::{AppConfig, AppState, LogFormat};
use cerp_llm_client::{HttpExtractor, HttpKnowledgeBase, KnowledgeConfig, LlmConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();

    // Initialize structured tracing.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let mut extraction = ExtractionService::new();

    match LlmConfig::from_env()? {
        Some(llm) => {
            tracing::info!(model = %llm.model, "LLM extractor configured");
            extraction = extraction.with_extractor(Arc::new(HttpExtractor::new(llm)?));
        }
        None => tracing::warn!(
            "LLM extractor not configured (CERP_LLM_URL / CERP_LLM_API_KEY). \
             /analyze-contract will return the fallback contract."
        ),
    }

    if let Some(kb) = KnowledgeConfig::from_env()? {
        tracing::info!(url = %kb.url, top_k = kb.top_k, "knowledge base configured");
        let top_k = kb.top_k;
        extraction = extraction.with_knowledge_base(Arc::new(HttpKnowledgeBase::new(kb)?), top_k);
    }

    if config.strict_phases {
        tracing::info!("strict phase lookup enabled");
    }

    let port = config.port;
    let mut state = AppState::with_config(config, extraction);
    if let Some(handle) = cerp_api::middleware::metrics::install_recorder() {
        state = state.with_metrics(handle);
    }

    let app = cerp_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("cerp-api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
