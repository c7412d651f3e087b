//! # Structural Consistency Checks
//!
//! Read-only inspection of a contract snapshot against the invariants the
//! state machine relies on:
//!
//! - exactly three phases, in INITIATION, EXECUTION, CLOSURE order;
//! - action ids unique across the contract;
//! - `current_phase` names a phase that exists;
//! - at most one ACTIVE phase; phases before the current one COMPLETED and
//!   phases after it PENDING.
//!
//! The state machine itself tolerates violations (see `LookupPolicy` in
//! `cerp-state`). These checks back the CLI `validate` command and let
//! callers reject corrupt snapshots up front.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::contract::{Contract, PhaseName, PhaseStatus};
use crate::error::CerpError;

/// A single invariant violation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsistencyIssue {
    #[error("expected 3 phases, found {found}")]
    PhaseCount { found: usize },

    #[error("phase at position {position} is {found}, expected {expected}")]
    PhaseOrder {
        position: usize,
        expected: PhaseName,
        found: PhaseName,
    },

    #[error("action id {action_id:?} appears {occurrences} times")]
    DuplicateActionId {
        action_id: String,
        occurrences: usize,
    },

    #[error("current phase {current} is not present in phases")]
    CurrentPhaseMissing { current: PhaseName },

    #[error("{count} phases are ACTIVE")]
    MultipleActivePhases { count: usize },

    #[error("phase {phase} is {found} but should be {expected} relative to current phase {current}")]
    PhaseStatusOrder {
        phase: PhaseName,
        current: PhaseName,
        expected: PhaseStatus,
        found: PhaseStatus,
    },
}

impl Contract {
    /// Every invariant violation in this snapshot, in detection order.
    pub fn check_consistency(&self) -> Vec<ConsistencyIssue> {
        let mut issues = Vec::new();

        if self.phases.len() != PhaseName::SEQUENCE.len() {
            issues.push(ConsistencyIssue::PhaseCount {
                found: self.phases.len(),
            });
        }
        for (position, (phase, expected)) in
            self.phases.iter().zip(PhaseName::SEQUENCE).enumerate()
        {
            if phase.name != expected {
                issues.push(ConsistencyIssue::PhaseOrder {
                    position,
                    expected,
                    found: phase.name,
                });
            }
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for action in self.actions() {
            if !seen.insert(action.id.as_str()) && reported.insert(action.id.as_str()) {
                let occurrences = self.actions().filter(|a| a.id == action.id).count();
                issues.push(ConsistencyIssue::DuplicateActionId {
                    action_id: action.id.clone(),
                    occurrences,
                });
            }
        }

        let active = self
            .phases
            .iter()
            .filter(|p| p.status == PhaseStatus::Active)
            .count();
        if active > 1 {
            issues.push(ConsistencyIssue::MultipleActivePhases { count: active });
        }

        let current = self.current_phase;
        if self.current_phase_index().is_none() {
            issues.push(ConsistencyIssue::CurrentPhaseMissing { current });
            return issues;
        }

        for phase in &self.phases {
            let expected = match phase.name.position().cmp(&current.position()) {
                std::cmp::Ordering::Less => PhaseStatus::Completed,
                std::cmp::Ordering::Greater => PhaseStatus::Pending,
                // The current phase may be PENDING (not yet opened), ACTIVE,
                // or COMPLETED (terminal CLOSURE).
                std::cmp::Ordering::Equal => continue,
            };
            if phase.status != expected {
                issues.push(ConsistencyIssue::PhaseStatusOrder {
                    phase: phase.name,
                    current,
                    expected,
                    found: phase.status,
                });
            }
        }

        issues
    }

    /// `Ok(())` when [`Contract::check_consistency`] finds nothing.
    pub fn ensure_consistent(&self) -> Result<(), CerpError> {
        let issues = self.check_consistency();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(CerpError::Inconsistent {
                contract_id: self.contract_id.clone(),
                issues,
            })
        }
    }
}
