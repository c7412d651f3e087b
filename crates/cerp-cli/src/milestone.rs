//! # Evidence and Advance Subcommands
//!
//! `cerp evidence` runs the full milestone workflow for one action: judge
//! the evidence, record it, and advance the phase if the current phase is
//! now complete. `cerp advance` runs only the phase transition step.
//!
//! The updated contract goes to `--out` or, without it, to stdout as JSON.
//! When the contract is printed to stdout, the agent response goes to
//! stderr so the output stays parseable. Nothing is written when the
//! workflow fails.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cerp_agentic::MilestoneWorkflow;
use cerp_state::{LookupPolicy, PhaseTransition, PhaseTransitionManager};

use crate::contract_io::{read_contract, write_contract};

/// Arguments for the `cerp evidence` subcommand.
#[derive(Args, Debug)]
pub struct EvidenceArgs {
    /// Contract file (JSON or YAML).
    pub file: PathBuf,

    /// Id of the action the evidence is for.
    #[arg(long)]
    pub action: String,

    /// Free-text evidence.
    #[arg(long)]
    pub evidence: String,

    /// Fail on a current phase that is missing from the contract.
    #[arg(long)]
    pub strict: bool,

    /// Write the updated contract here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the `cerp advance` subcommand.
#[derive(Args, Debug)]
pub struct AdvanceArgs {
    /// Contract file (JSON or YAML).
    pub file: PathBuf,

    /// Fail on a current phase that is missing from the contract.
    #[arg(long)]
    pub strict: bool,

    /// Write the updated contract here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

fn lookup_policy(strict: bool) -> LookupPolicy {
    if strict {
        LookupPolicy::Strict
    } else {
        LookupPolicy::Lenient
    }
}

/// Print a status line without corrupting a contract printed to stdout.
fn report(line: &str, contract_on_stdout: bool) {
    if contract_on_stdout {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

fn describe(transition: Option<&PhaseTransition>) -> String {
    match transition {
        Some(t) => format!("phase transition: {t}"),
        None => "no phase transition".to_string(),
    }
}

/// Execute the evidence subcommand.
pub fn run_evidence(args: &EvidenceArgs) -> Result<u8> {
    let mut contract = read_contract(&args.file)?;
    let workflow = MilestoneWorkflow::with_policy(lookup_policy(args.strict));

    let outcome = workflow
        .process_evidence(&mut contract, &args.action, &args.evidence)
        .with_context(|| format!("evidence for {} was not applied", args.action))?;

    let to_stdout = args.out.is_none();
    report(&outcome.agent_response, to_stdout);
    report(&describe(outcome.transition.as_ref()), to_stdout);

    write_contract(&contract, args.out.as_deref())?;
    if let Some(out) = &args.out {
        println!("OK: wrote {}", out.display());
    }
    Ok(0)
}

/// Execute the advance subcommand.
pub fn run_advance(args: &AdvanceArgs) -> Result<u8> {
    let mut contract = read_contract(&args.file)?;
    let manager = PhaseTransitionManager::new(lookup_policy(args.strict));

    let transition = manager
        .advance(&mut contract)
        .with_context(|| format!("contract {} cannot advance", contract.contract_id))?;

    let to_stdout = args.out.is_none();
    report(&describe(transition.as_ref()), to_stdout);

    write_contract(&contract, args.out.as_deref())?;
    if let Some(out) = &args.out {
        println!("OK: wrote {}", out.display());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerp_core::{fallback_contract, ActionStatus, Contract, PhaseName, PhaseStatus};

    fn setup(contract: &Contract) -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("contract.yaml");
        let output = dir.path().join("updated.json");
        std::fs::write(&input, serde_yaml::to_string(contract).unwrap()).unwrap();
        (dir, input, output)
    }

    fn active_fallback() -> Contract {
        let mut c = fallback_contract();
        c.activate_initial_phase();
        c
    }

    #[test]
    fn evidence_completes_action_and_advances() {
        let (_dir, input, output) = setup(&active_fallback());
        let args = EvidenceArgs {
            file: input,
            action: "ACT-01".into(),
            evidence: "Acta firmada: done".into(),
            strict: false,
            out: Some(output.clone()),
        };
        assert_eq!(run_evidence(&args).unwrap(), 0);

        let updated = read_contract(&output).unwrap();
        assert_eq!(updated.current_phase, PhaseName::Execution);
        assert_eq!(updated.phases[0].status, PhaseStatus::Completed);
        let action = updated.find_action("ACT-01").unwrap();
        assert_eq!(action.status, ActionStatus::Completed);
        assert_eq!(action.evidence.len(), 1);
    }

    #[test]
    fn insufficient_evidence_leaves_contract_unchanged() {
        let contract = active_fallback();
        let (_dir, input, output) = setup(&contract);
        let args = EvidenceArgs {
            file: input,
            action: "ACT-01".into(),
            evidence: "waiting on signatures".into(),
            strict: false,
            out: Some(output.clone()),
        };
        assert_eq!(run_evidence(&args).unwrap(), 0);
        assert_eq!(read_contract(&output).unwrap(), contract);
    }

    #[test]
    fn unknown_action_writes_nothing() {
        let (_dir, input, output) = setup(&active_fallback());
        let args = EvidenceArgs {
            file: input,
            action: "ACT-404".into(),
            evidence: "done".into(),
            strict: false,
            out: Some(output.clone()),
        };
        let err = run_evidence(&args).unwrap_err();
        assert!(format!("{err:#}").contains("ACT-404"));
        assert!(!output.exists());
    }

    #[test]
    fn strict_evidence_rejects_dangling_current_phase() {
        let mut contract = active_fallback();
        contract.phases[0].name = PhaseName::Execution;
        contract.phases.remove(1);
        let (_dir, input, output) = setup(&contract);
        let args = EvidenceArgs {
            file: input,
            action: "ACT-01".into(),
            evidence: "done".into(),
            strict: true,
            out: Some(output.clone()),
        };
        assert!(run_evidence(&args).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn advance_skips_empty_phase() {
        let mut contract = active_fallback();
        contract.phases[0].actions.clear();
        let (_dir, input, output) = setup(&contract);
        let args = AdvanceArgs {
            file: input,
            strict: false,
            out: Some(output.clone()),
        };
        assert_eq!(run_advance(&args).unwrap(), 0);

        let updated = read_contract(&output).unwrap();
        assert_eq!(updated.current_phase, PhaseName::Execution);
        assert_eq!(updated.phases[1].status, PhaseStatus::Active);
    }

    #[test]
    fn advance_without_progress_is_a_no_op() {
        let contract = active_fallback();
        let (_dir, input, output) = setup(&contract);
        let args = AdvanceArgs {
            file: input,
            strict: true,
            out: Some(output.clone()),
        };
        assert_eq!(run_advance(&args).unwrap(), 0);
        assert_eq!(read_contract(&output).unwrap(), contract);
    }

    #[test]
    fn describe_transitions() {
        let t = PhaseTransition {
            from: PhaseName::Closure,
            to: None,
        };
        assert_eq!(describe(Some(&t)), "phase transition: CLOSURE -> CLOSED");
        assert_eq!(describe(None), "no phase transition");
    }
}
