//! # cerp-agentic: Milestone Workflow and Extraction
//!
//! The agentic layer of the contract ERP. It composes the state machines in
//! `cerp-state` into the two operations callers actually invoke.
//!
//! ## Architecture
//!
//! - **Workflow** (`workflow.rs`): locates an action by id, runs the
//!   evidence evaluator on it and then the phase transition manager on the
//!   same contract instance. One call, one `&mut Contract`.
//!
//! - **Extraction** (`extraction.rs`): turns raw contract text into a
//!   structured `Contract` through injected collaborators (an extractor and
//!   a knowledge base). Collaborator failures degrade to the fallback
//!   skeleton; extraction never fails.
//!
//! ## Crate Policy
//!
//! - No I/O of its own. Network-backed collaborators live in
//!   `cerp-llm-client` and are injected as `Arc<dyn ...>`.
//! - Emits `tracing` spans and `metrics` counters; installing a subscriber
//!   or recorder is the binary's job.

pub mod extraction;
pub mod workflow;

pub use extraction::{
    ContractExtractor, ExtractionError, ExtractionService, KnowledgeBase, KnowledgeError,
};
pub use workflow::{MilestoneWorkflow, WorkflowError, WorkflowReport};
