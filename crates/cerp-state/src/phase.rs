//! # Phase Transition Manager
//!
//! Closes the current phase once every action in it is completed and opens
//! the next phase in the fixed sequence.
//!
//! ## Transition Table
//!
//! | current    | condition              | effect                                              |
//! |------------|------------------------|-----------------------------------------------------|
//! | INITIATION | all actions completed  | INITIATION → COMPLETED, current ← EXECUTION (ACTIVE) |
//! | EXECUTION  | all actions completed  | EXECUTION → COMPLETED, current ← CLOSURE (ACTIVE)    |
//! | CLOSURE    | all actions completed  | CLOSURE → COMPLETED, current unchanged (terminal)    |
//! | any        | otherwise              | no change                                           |
//!
//! A phase with no actions is complete by vacuous truth and advances the
//! first time the manager runs while it is current. Each call performs at
//! most one step; an empty successor waits for the next call.
//!
//! ## Inconsistent snapshots
//!
//! When `current_phase` names no phase in `phases`, or the successor phase
//! is missing, the contract is left untouched. [`LookupPolicy::Lenient`]
//! logs and reports no transition; [`LookupPolicy::Strict`] returns a
//! [`TransitionError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cerp_core::{Contract, PhaseName, PhaseStatus};

// ─── Policy ──────────────────────────────────────────────────────────

/// How the manager reacts to a snapshot whose phases do not line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupPolicy {
    /// Leave the contract unchanged and report no transition.
    #[default]
    Lenient,
    /// Leave the contract unchanged and return an error.
    Strict,
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Internal-consistency errors surfaced under [`LookupPolicy::Strict`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// `current_phase` does not match any phase in the contract.
    #[error("contract {contract_id}: current phase {current} not found in phases")]
    PhaseLookupInconsistency {
        contract_id: String,
        current: PhaseName,
    },

    /// The current phase is complete but the phase after it is absent.
    #[error("contract {contract_id}: phase {from} is complete but successor {to} is missing")]
    MissingSuccessor {
        contract_id: String,
        from: PhaseName,
        to: PhaseName,
    },
}

// ─── Transition Record ───────────────────────────────────────────────

/// A phase closed by one call to [`PhaseTransitionManager::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// The phase that was completed.
    pub from: PhaseName,
    /// The phase that was opened, `None` when the contract closed.
    pub to: Option<PhaseName>,
}

impl PhaseTransition {
    /// Whether this transition closed the contract.
    pub fn closes_contract(&self) -> bool {
        self.to.is_none()
    }
}

impl std::fmt::Display for PhaseTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to {
            Some(to) => write!(f, "{} -> {}", self.from, to),
            None => write!(f, "{} -> CLOSED", self.from),
        }
    }
}

// ─── Manager ─────────────────────────────────────────────────────────

/// Drives the INITIATION → EXECUTION → CLOSURE progression.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTransitionManager {
    policy: LookupPolicy,
}

impl PhaseTransitionManager {
    pub fn new(policy: LookupPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> LookupPolicy {
        self.policy
    }

    /// Run one step of the transition table against `contract`.
    ///
    /// Returns the transition performed, or `None` when nothing changed.
    /// Idempotent on a closed contract.
    pub fn advance(
        &self,
        contract: &mut Contract,
    ) -> Result<Option<PhaseTransition>, TransitionError> {
        let current = contract.current_phase;
        let Some(idx) = contract.current_phase_index() else {
            return self.inconsistent(TransitionError::PhaseLookupInconsistency {
                contract_id: contract.contract_id.clone(),
                current,
            });
        };

        let phase = &contract.phases[idx];
        if current == PhaseName::Closure && phase.status == PhaseStatus::Completed {
            return Ok(None);
        }
        if !phase.all_actions_completed() {
            return Ok(None);
        }

        let transition = match current.next() {
            None => {
                contract.phases[idx].status = PhaseStatus::Completed;
                PhaseTransition {
                    from: current,
                    to: None,
                }
            }
            Some(next) => {
                let Some(next_idx) = contract.phase_index(next) else {
                    return self.inconsistent(TransitionError::MissingSuccessor {
                        contract_id: contract.contract_id.clone(),
                        from: current,
                        to: next,
                    });
                };
                contract.phases[idx].status = PhaseStatus::Completed;
                contract.current_phase = next;
                contract.phases[next_idx].status = PhaseStatus::Active;
                PhaseTransition {
                    from: current,
                    to: Some(next),
                }
            }
        };

        tracing::info!(
            contract_id = %contract.contract_id,
            transition = %transition,
            "phase transition"
        );
        Ok(Some(transition))
    }

    fn inconsistent(
        &self,
        err: TransitionError,
    ) -> Result<Option<PhaseTransition>, TransitionError> {
        match self.policy {
            LookupPolicy::Lenient => {
                tracing::warn!(error = %err, "inconsistent phase state, transition skipped");
                Ok(None)
            }
            LookupPolicy::Strict => Err(err),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
