//! # Contract Extraction
//!
//! Turns raw contract text into a structured [`Contract`].
//!
//! The heavy lifting is done by two injected collaborators:
//!
//! - a [`KnowledgeBase`] that returns reference snippets (vendor master
//!   data, purchasing policies) relevant to the contract text, and
//! - a [`ContractExtractor`] that produces the structured contract from the
//!   text plus those snippets.
//!
//! [`ExtractionService`] owns the degradation policy. A failing knowledge
//! base yields an empty context. A missing or failing extractor yields
//! [`fallback_contract`]. Either way the result has its initial phase
//! activated, so the milestone workflow can run on it immediately.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use cerp_core::{fallback_contract, Contract};

/// Default number of knowledge-base snippets retrieved per extraction.
pub const DEFAULT_TOP_K: usize = 3;

/// Instructions given to the extraction model.
pub const EXTRACTION_INSTRUCTIONS: &str = "You are an expert legal AI. Extract the contract \
structure, parties, and actionable items into the specified JSON format. Divide the contract \
strictly into 3 phases: INITIATION, EXECUTION, CLOSURE. For each phase, list specific Action \
Items with clear success criteria.";

// ─── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No extractor credentials or endpoint are configured.
    #[error("contract extractor is not configured")]
    Unconfigured,

    /// The extractor could not be reached or answered with a failure.
    #[error("contract extractor unavailable: {0}")]
    Unavailable(String),

    /// The extractor answered, but not with a usable contract.
    #[error("invalid extractor response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("knowledge base unavailable: {0}")]
    Unavailable(String),

    #[error("invalid knowledge base response: {0}")]
    InvalidResponse(String),
}

// ─── Collaborators ───────────────────────────────────────────────────

/// Produces a structured contract from raw text.
#[async_trait]
pub trait ContractExtractor: Send + Sync {
    async fn extract(
        &self,
        raw_text: &str,
        context: &[String],
    ) -> Result<Contract, ExtractionError>;
}

/// Retrieves reference snippets relevant to a piece of text.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<String>, KnowledgeError>;
}

// ─── Prompt ──────────────────────────────────────────────────────────

/// System prompt for the extractor: the fixed instructions followed by any
/// retrieved reference context.
pub fn build_system_prompt(context: &[String]) -> String {
    let mut prompt = EXTRACTION_INSTRUCTIONS.to_string();
    let snippets: Vec<&str> = context
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !snippets.is_empty() {
        prompt.push_str("\n\nReference context from the company knowledge base:");
        for snippet in snippets {
            prompt.push_str("\n- ");
            prompt.push_str(snippet);
        }
    }
    prompt
}

// ─── Service ─────────────────────────────────────────────────────────

/// Extraction with fallback. Never fails.
#[derive(Clone)]
pub struct ExtractionService {
    extractor: Option<Arc<dyn ContractExtractor>>,
    knowledge: Option<Arc<dyn KnowledgeBase>>,
    top_k: usize,
}

impl std::fmt::Debug for ExtractionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionService")
            .field("extractor", &self.extractor.is_some())
            .field("knowledge", &self.knowledge.is_some())
            .field("top_k", &self.top_k)
            .finish()
    }
}

impl Default for ExtractionService {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionService {
    /// Service with no collaborators: every extraction returns the
    /// fallback contract.
    pub fn new() -> Self {
        Self {
            extractor: None,
            knowledge: None,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn ContractExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_knowledge_base(mut self, knowledge: Arc<dyn KnowledgeBase>, top_k: usize) -> Self {
        self.knowledge = Some(knowledge);
        self.top_k = top_k;
        self
    }

    pub fn has_extractor(&self) -> bool {
        self.extractor.is_some()
    }

    /// Extract a contract from `raw_text`, degrading to the fallback
    /// skeleton on any collaborator failure.
    pub async fn extract(&self, raw_text: &str) -> Contract {
        let context = self.retrieve_context(raw_text).await;

        let mut contract = match &self.extractor {
            None => {
                tracing::warn!(
                    error = %ExtractionError::Unconfigured,
                    "returning fallback contract"
                );
                fallback_contract()
            }
            Some(extractor) => match extractor.extract(raw_text, &context).await {
                Ok(contract) => {
                    tracing::info!(
                        contract_id = %contract.contract_id,
                        phases = contract.phases.len(),
                        actions = contract.actions().count(),
                        "contract extracted"
                    );
                    contract
                }
                Err(e) => {
                    tracing::warn!(error = %e, "extraction failed, returning fallback contract");
                    fallback_contract()
                }
            },
        };

        contract.activate_initial_phase();
        contract
    }

    async fn retrieve_context(&self, raw_text: &str) -> Vec<String> {
        let Some(knowledge) = &self.knowledge else {
            return Vec::new();
        };
        match knowledge.query(raw_text, self.top_k).await {
            Ok(snippets) => {
                tracing::debug!(snippets = snippets.len(), "knowledge context retrieved");
                snippets
            }
            Err(e) => {
                tracing::warn!(error = %e, "knowledge base query failed, continuing without context");
                Vec::new()
            }
        }
    }
}
