//! # Status Subcommand
//!
//! Prints a contract's phases and actions with their statuses, followed by
//! the overall completion count.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cerp_core::Contract;

use crate::contract_io::read_contract;

/// Arguments for the `cerp status` subcommand.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Contract file (JSON or YAML).
    pub file: PathBuf,
}

/// Render the status table.
///
/// ```text
/// Contract MOCK-001: Contrato de Servicio - Fallback
/// Current phase: INITIATION
///
/// INITIATION [ACTIVE] Preparación
///   [pending    ] ACT-01  Firmar acta de inicio
/// EXECUTION [PENDING] Desarrollo
/// CLOSURE [PENDING] Finalización
///
/// Completion: 0/1 actions (0%)
/// ```
pub fn render_status(contract: &Contract) -> String {
    let mut out = String::new();
    match &contract.title {
        Some(title) => {
            let _ = writeln!(out, "Contract {}: {title}", contract.contract_id);
        }
        None => {
            let _ = writeln!(out, "Contract {}", contract.contract_id);
        }
    }
    if contract.is_closed() {
        let _ = writeln!(out, "Current phase: {} (closed)", contract.current_phase);
    } else {
        let _ = writeln!(out, "Current phase: {}", contract.current_phase);
    }
    out.push('\n');

    for phase in &contract.phases {
        let _ = write!(out, "{} [{}]", phase.name, phase.status);
        if let Some(desc) = &phase.description {
            let _ = write!(out, " {desc}");
        }
        out.push('\n');
        for action in &phase.actions {
            let _ = writeln!(
                out,
                "  [{:<11}] {}  {}",
                action.status.to_string(),
                action.id,
                action.description
            );
        }
    }

    let completion = contract.completion();
    let _ = writeln!(
        out,
        "\nCompletion: {}/{} actions ({}%)",
        completion.completed,
        completion.total,
        completion.percent()
    );
    out
}

/// Execute the status subcommand.
pub fn run_status(args: &StatusArgs) -> Result<u8> {
    let contract = read_contract(&args.file)?;
    print!("{}", render_status(&contract));
    Ok(0)
}
