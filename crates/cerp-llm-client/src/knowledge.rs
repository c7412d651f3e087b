//! Knowledge-base retrieval client.
//!
//! `POST {url}` with `{"query", "top_k"}`; the service answers
//! `{"documents": ["...", ...]}` ordered by relevance.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cerp_agentic::{KnowledgeBase, KnowledgeError};

use crate::config::KnowledgeConfig;
use crate::error::ClientError;

const ENDPOINT: &str = "POST knowledge/query";

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Vec<String>,
}

/// [`KnowledgeBase`] backed by an HTTP retrieval service.
#[derive(Debug, Clone)]
pub struct HttpKnowledgeBase {
    http: reqwest::Client,
    config: KnowledgeConfig,
}

impl HttpKnowledgeBase {
    pub fn new(config: KnowledgeConfig) -> Result<Self, ClientError> {
        let http = crate::build_http_client(config.timeout_secs, None)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &KnowledgeConfig {
        &self.config
    }

    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<String>, ClientError> {
        let resp = self
            .http
            .post(self.config.url.clone())
            .json(&QueryRequest { query, top_k })
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

        let parsed: QueryResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Deserialization {
                endpoint: ENDPOINT.into(),
                reason: e.to_string(),
            })?;
        let mut documents = parsed.documents;
        documents.truncate(top_k);
        Ok(documents)
    }
}

#[async_trait]
impl KnowledgeBase for HttpKnowledgeBase {
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<String>, KnowledgeError> {
        Ok(self.search(text, top_k).await?)
    }
}
