//! # Milestone Workflow
//!
//! One evidence submission against one contract:
//!
//! ```text
//! locate(action_id) ──▶ evaluate(action, evidence) ──▶ advance(contract)
//!        │                                                   │
//!        └── miss: ActionNotFound, contract untouched        └── Strict miss: Transition error
//! ```
//!
//! Both error paths leave the caller's contract untouched. Under
//! [`LookupPolicy::Strict`] evaluation and advancement run on a copy that
//! replaces the caller's snapshot only on success.
//!
//! The manager runs after every evaluation, including INSUFFICIENT ones,
//! so a contract whose current phase was already complete (for example an
//! empty phase) still moves forward.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cerp_core::{ActionLocation, Contract};
use cerp_state::{
    Decision, EvidenceEvaluator, EvidenceJudge, KeywordJudge, LookupPolicy, PhaseTransition,
    PhaseTransitionManager, TransitionError,
};

// ─── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// No action with the requested id exists in any phase.
    #[error("action {action_id} not found in contract {contract_id}")]
    ActionNotFound {
        action_id: String,
        contract_id: String,
    },

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

// ─── Report ──────────────────────────────────────────────────────────

/// Outcome of one workflow invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowReport {
    pub decision: Decision,
    /// Human-readable evaluator message.
    pub agent_response: String,
    /// Phase closed by this call, if any.
    pub transition: Option<PhaseTransition>,
}

// ─── Workflow ────────────────────────────────────────────────────────

/// Evidence evaluation followed by phase advancement.
#[derive(Debug, Clone, Default)]
pub struct MilestoneWorkflow<J = KeywordJudge> {
    evaluator: EvidenceEvaluator<J>,
    manager: PhaseTransitionManager,
}

impl MilestoneWorkflow {
    /// Keyword-judged workflow with the given phase lookup policy.
    pub fn with_policy(policy: LookupPolicy) -> Self {
        Self::new(
            EvidenceEvaluator::new(KeywordJudge::default()),
            PhaseTransitionManager::new(policy),
        )
    }
}

impl<J: EvidenceJudge> MilestoneWorkflow<J> {
    pub fn new(evaluator: EvidenceEvaluator<J>, manager: PhaseTransitionManager) -> Self {
        Self { evaluator, manager }
    }

    pub fn policy(&self) -> LookupPolicy {
        self.manager.policy()
    }

    /// Apply `evidence_text` to the first action named `action_id` and
    /// advance the contract's phase if that completed it.
    pub fn process_evidence(
        &self,
        contract: &mut Contract,
        action_id: &str,
        evidence_text: &str,
    ) -> Result<WorkflowReport, WorkflowError> {
        let span = tracing::info_span!(
            "process_evidence",
            contract_id = %contract.contract_id,
            action_id = %action_id,
        );
        let _guard = span.enter();

        let location =
            contract
                .locate_action(action_id)
                .ok_or_else(|| WorkflowError::ActionNotFound {
                    action_id: action_id.to_string(),
                    contract_id: contract.contract_id.clone(),
                })?;

        match self.policy() {
            LookupPolicy::Lenient => Ok(self.apply(contract, location, evidence_text)?),
            LookupPolicy::Strict => {
                // A transition error must leave the caller's snapshot as it was.
                let mut scratch = contract.clone();
                let report = self.apply(&mut scratch, location, evidence_text)?;
                *contract = scratch;
                Ok(report)
            }
        }
    }

    fn apply(
        &self,
        contract: &mut Contract,
        location: ActionLocation,
        evidence_text: &str,
    ) -> Result<WorkflowReport, TransitionError> {
        let evaluation = self
            .evaluator
            .evaluate(contract.action_at_mut(location), Some(evidence_text));
        metrics::counter!(
            "cerp_evidence_evaluations_total",
            "decision" => evaluation.decision.as_str()
        )
        .increment(1);

        let transition = self.manager.advance(contract)?;
        if let Some(t) = transition {
            metrics::counter!(
                "cerp_phase_transitions_total",
                "from" => t.from.as_str(),
                "to" => t.to.map_or("CLOSED", |p| p.as_str())
            )
            .increment(1);
        }

        tracing::info!(
            decision = %evaluation.decision,
            phase = %contract.current_phase,
            "evidence processed"
        );

        Ok(WorkflowReport {
            decision: evaluation.decision,
            agent_response: evaluation.message,
            transition,
        })
    }

    /// By-value form of [`process_evidence`](Self::process_evidence) for
    /// callers that own the snapshot.
    pub fn run(
        &self,
        mut contract: Contract,
        action_id: &str,
        evidence_text: &str,
    ) -> Result<(Contract, String), WorkflowError> {
        let report = self.process_evidence(&mut contract, action_id, evidence_text)?;
        Ok((contract, report.agent_response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerp_core::{ActionItem, ActionStatus, Phase, PhaseName, PhaseStatus};
    use cerp_state::evaluator::{MSG_COMPLETED, MSG_INSUFFICIENT, MSG_MISSING_INPUT};

    fn contract() -> Contract {
        let mut c = Contract::new(
            "C-1",
            vec!["A".into(), "B".into()],
            vec![
                Phase::new(
                    PhaseName::Initiation,
                    "",
                    vec![ActionItem::new("A1", "Sign", "Signed by both")],
                ),
                Phase::new(
                    PhaseName::Execution,
                    "",
                    vec![ActionItem::new("B1", "Deliver", "Delivered")],
                ),
                Phase::new(PhaseName::Closure, "", vec![]),
            ],
        );
        c.activate_initial_phase();
        c
    }

    fn lenient() -> MilestoneWorkflow {
        MilestoneWorkflow::default()
    }

    #[test]
    fn test_met_evidence_completes_action_and_advances() {
        let wf = lenient();
        let mut c = contract();
        let report = wf
            .process_evidence(&mut c, "A1", "Signed, see https://x.io/doc")
            .unwrap();

        assert_eq!(report.decision, Decision::Met);
        assert_eq!(report.agent_response, MSG_COMPLETED);
        assert_eq!(
            report.transition,
            Some(PhaseTransition {
                from: PhaseName::Initiation,
                to: Some(PhaseName::Execution),
            })
        );
        let action = c.find_action("A1").unwrap();
        assert_eq!(action.status, ActionStatus::Completed);
        assert_eq!(action.evidence.len(), 1);
        assert_eq!(action.evidence[0].url.as_deref(), Some("https://x.io/doc"));
        assert_eq!(c.current_phase, PhaseName::Execution);
        assert_eq!(c.phases[1].status, PhaseStatus::Active);
    }

    #[test]
    fn test_insufficient_evidence_leaves_contract_unchanged() {
        let wf = lenient();
        let mut c = contract();
        let before = c.clone();
        let report = wf.process_evidence(&mut c, "A1", "working on it").unwrap();
        assert_eq!(report.decision, Decision::Insufficient);
        assert_eq!(report.agent_response, MSG_INSUFFICIENT);
        assert_eq!(report.transition, None);
        assert_eq!(c, before);
    }

    #[test]
    fn test_unknown_action_is_not_found() {
        let wf = lenient();
        let mut c = contract();
        let before = c.clone();
        let err = wf.process_evidence(&mut c, "ZZ", "done").unwrap_err();
        assert_eq!(
            err,
            WorkflowError::ActionNotFound {
                action_id: "ZZ".into(),
                contract_id: "C-1".into(),
            }
        );
        assert_eq!(c, before);
    }

    #[test]
    fn test_blank_evidence_reports_missing_input() {
        let wf = lenient();
        let mut c = contract();
        let report = wf.process_evidence(&mut c, "A1", "   ").unwrap();
        assert_eq!(report.agent_response, MSG_MISSING_INPUT);
        assert!(!c.find_action("A1").unwrap().is_completed());
    }

    #[test]
    fn test_evidence_on_later_phase_action_does_not_skip_phases() {
        let wf = lenient();
        let mut c = contract();
        let report = wf.process_evidence(&mut c, "B1", "done").unwrap();
        assert_eq!(report.decision, Decision::Met);
        assert_eq!(report.transition, None);
        assert_eq!(c.current_phase, PhaseName::Initiation);
    }

    #[test]
    fn test_strict_policy_propagates_transition_error() {
        let wf = MilestoneWorkflow::with_policy(LookupPolicy::Strict);
        let mut c = contract();
        c.phases.retain(|p| p.name != PhaseName::Initiation);
        let before = c.clone();
        let err = wf.process_evidence(&mut c, "B1", "done").unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Transition(TransitionError::PhaseLookupInconsistency { .. })
        ));
        assert_eq!(c, before);
    }

    #[test]
    fn test_strict_error_leaves_contract_untouched_when_current_phase_is_missing() {
        let wf = MilestoneWorkflow::with_policy(LookupPolicy::Strict);
        let mut c = contract();
        c.phases.retain(|p| p.name != PhaseName::Closure);
        c.current_phase = PhaseName::Closure;
        let before = c.clone();

        assert!(wf.process_evidence(&mut c, "B1", "done").is_err());
        assert_eq!(c, before);
        let action = c.find_action("B1").unwrap();
        assert_eq!(action.status, ActionStatus::Pending);
        assert!(action.evidence.is_empty());
    }

    #[test]
    fn test_strict_error_leaves_contract_untouched_when_successor_is_missing() {
        let wf = MilestoneWorkflow::with_policy(LookupPolicy::Strict);
        let mut c = contract();
        c.phases.retain(|p| p.name != PhaseName::Execution);
        let before = c.clone();

        let err = wf.process_evidence(&mut c, "A1", "done").unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Transition(TransitionError::MissingSuccessor { .. })
        ));
        assert_eq!(c, before);
    }

    #[test]
    fn test_strict_success_commits_changes() {
        let wf = MilestoneWorkflow::with_policy(LookupPolicy::Strict);
        let mut c = contract();
        let report = wf.process_evidence(&mut c, "A1", "done").unwrap();
        assert_eq!(report.decision, Decision::Met);
        assert_eq!(c.current_phase, PhaseName::Execution);
        assert!(c.find_action("A1").unwrap().is_completed());
    }

    #[test]
    fn test_run_returns_updated_snapshot() {
        let wf = lenient();
        let (updated, response) = wf.run(contract(), "A1", "Todo completo").unwrap();
        assert_eq!(response, MSG_COMPLETED);
        assert_eq!(updated.current_phase, PhaseName::Execution);
    }
}
