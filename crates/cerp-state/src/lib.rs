//! # cerp-state: Milestone State Machines
//!
//! The two state-changing components of the contract ERP. Both operate on a
//! borrowed `cerp_core::Contract` (or one of its actions) and mutate it in
//! place; neither holds state between calls.
//!
//! ## State Machines
//!
//! - **Evidence evaluation** (`evaluator.rs`): judges one piece of evidence
//!   against one action. A positive decision moves the action to
//!   `completed` and appends the evidence record. Action statuses only move
//!   forward; a completed action is never reopened.
//!
//! - **Phase transitions** (`phase.rs`): closes the current phase once all of
//!   its actions are completed and opens the next one.
//!
//! ```text
//! INITIATION ──▶ EXECUTION ──▶ CLOSURE ──▶ (CLOSURE, COMPLETED) terminal
//! ```
//!
//! ## Design
//!
//! The evidence decision sits behind the `EvidenceJudge` trait so that the
//! keyword heuristic in use today and a model-backed reviewer share one
//! seam. Inconsistent snapshots (a `current_phase` with no matching phase)
//! are handled according to an explicit `LookupPolicy` instead of being
//! silently absorbed everywhere.

pub mod evaluator;
pub mod phase;

// ─── Evaluator re-exports ───────────────────────────────────────────

pub use evaluator::{Decision, Evaluation, EvidenceEvaluator, EvidenceJudge, KeywordJudge};

// ─── Phase re-exports ───────────────────────────────────────────────

pub use phase::{LookupPolicy, PhaseTransition, PhaseTransitionManager, TransitionError};
