//! # cerp-llm-client: HTTP Collaborators
//!
//! Network-backed implementations of the collaborator traits declared in
//! `cerp-agentic`:
//!
//! - **Extractor** (`extractor.rs`): [`HttpExtractor`] sends the contract
//!   text and the extraction instructions to an LLM gateway and parses the
//!   structured contract from its JSON reply.
//! - **Knowledge base** (`knowledge.rs`): [`HttpKnowledgeBase`] retrieves
//!   reference snippets (vendor master data, purchasing policies) from a
//!   retrieval service.
//!
//! Both are configured from the environment (`config.rs`) and share one
//! error type (`error.rs`). The agentic layer never sees `reqwest` types;
//! failures are converted into `ExtractionError` / `KnowledgeError`, which
//! the extraction service absorbs into its fallback path.

pub mod config;
pub mod error;
pub mod extractor;
pub mod knowledge;

pub use config::{ConfigError, KnowledgeConfig, LlmConfig};
pub use error::ClientError;
pub use extractor::HttpExtractor;
pub use knowledge::HttpKnowledgeBase;

use std::time::Duration;

/// Shared `reqwest` client construction: request timeout plus an optional
/// bearer token.
pub(crate) fn build_http_client(
    timeout_secs: u64,
    bearer: Option<&str>,
) -> Result<reqwest::Client, ClientError> {
    let mut headers = reqwest::header::HeaderMap::new();
    if let Some(token) = bearer {
        let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ClientError::Config(ConfigError::InvalidCredential))?;
        headers.insert(reqwest::header::AUTHORIZATION, value);
    }
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(headers)
        .build()
        .map_err(|e| ClientError::Http {
            endpoint: "client_init".into(),
            source: e,
        })
}
