//! # Validate Subcommand
//!
//! Reports every structural invariant a contract snapshot violates:
//! phase count and order, duplicate action ids, a dangling current phase,
//! and phase statuses out of step with the current phase.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use cerp_core::{ConsistencyIssue, Contract};

use crate::contract_io::read_contract;

/// Arguments for the `cerp validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Contract file (JSON or YAML).
    pub file: PathBuf,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable validation result.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub contract_id: String,
    pub consistent: bool,
    pub issues: Vec<ConsistencyIssue>,
}

impl ValidationReport {
    pub fn for_contract(contract: &Contract) -> Self {
        let issues = contract.check_consistency();
        Self {
            contract_id: contract.contract_id.clone(),
            consistent: issues.is_empty(),
            issues,
        }
    }
}

/// Execute the validate subcommand. Exit code 1 when issues were found.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let contract = read_contract(&args.file)?;
    let report = ValidationReport::for_contract(&contract);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.consistent {
        println!("OK: contract {} is consistent", report.contract_id);
    } else {
        println!(
            "FAIL: contract {} has {} issue(s)",
            report.contract_id,
            report.issues.len()
        );
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }

    Ok(if report.consistent { 0 } else { 1 })
}
