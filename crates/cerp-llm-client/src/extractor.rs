//! LLM-gateway contract extractor.
//!
//! ## Wire format
//!
//! | Direction | Body |
//! |-----------|------|
//! | request   | `{"model", "system", "input", "temperature": 0}` |
//! | response  | a contract object, or `{"contract": <contract object>}` |
//!
//! `system` carries the extraction instructions followed by any
//! knowledge-base context; `input` is the raw contract text.

use async_trait::async_trait;
use serde::Serialize;

use cerp_agentic::extraction::build_system_prompt;
use cerp_agentic::{ContractExtractor, ExtractionError};
use cerp_core::Contract;

use crate::config::LlmConfig;
use crate::error::ClientError;

const ENDPOINT: &str = "POST extract";

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    model: &'a str,
    system: String,
    input: &'a str,
    temperature: f32,
}

/// [`ContractExtractor`] backed by an HTTP LLM gateway.
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    http: reqwest::Client,
    config: LlmConfig,
}

impl HttpExtractor {
    pub fn new(config: LlmConfig) -> Result<Self, ClientError> {
        let http = crate::build_http_client(config.timeout_secs, Some(&config.api_key))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send one extraction request and decode the structured contract.
    pub async fn request_contract(
        &self,
        raw_text: &str,
        context: &[String],
    ) -> Result<Contract, ClientError> {
        let body = ExtractRequest {
            model: &self.config.model,
            system: build_system_prompt(context),
            input: raw_text,
            temperature: 0.0,
        };

        let resp = self
            .http
            .post(self.config.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: ENDPOINT.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(ClientError::Api {
                endpoint: ENDPOINT.into(),
                status,
                body,
            });
        }

        let value: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ClientError::Deserialization {
                endpoint: ENDPOINT.into(),
                reason: e.to_string(),
            })?;
        decode_contract(value)
    }
}

#[async_trait]
impl ContractExtractor for HttpExtractor {
    async fn extract(
        &self,
        raw_text: &str,
        context: &[String],
    ) -> Result<Contract, ExtractionError> {
        tracing::debug!(
            model = %self.config.model,
            chars = raw_text.len(),
            context = context.len(),
            "requesting contract extraction"
        );
        Ok(self.request_contract(raw_text, context).await?)
    }
}

/// Accept either a bare contract or one wrapped in `{"contract": ...}`.
fn decode_contract(value: serde_json::Value) -> Result<Contract, ClientError> {
    let value = match value {
        serde_json::Value::Object(mut map) if !map.contains_key("contract_id") => {
            map.remove("contract").unwrap_or(serde_json::Value::Object(map))
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|e| ClientError::Deserialization {
        endpoint: ENDPOINT.into(),
        reason: e.to_string(),
    })
}
