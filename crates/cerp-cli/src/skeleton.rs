//! # Skeleton Subcommand
//!
//! Prints the fallback contract, the same one the service returns when no
//! extractor is configured. Useful as a template for hand-written contracts.

use anyhow::Result;
use clap::Args;

use cerp_core::fallback_contract;

use crate::contract_io::{render_contract, ContractFormat};

/// Arguments for the `cerp skeleton` subcommand.
#[derive(Args, Debug)]
pub struct SkeletonArgs {
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    pub format: ContractFormat,

    /// Open the first phase, as the service does after extraction.
    #[arg(long)]
    pub activate: bool,
}

/// Execute the skeleton subcommand.
pub fn run_skeleton(args: &SkeletonArgs) -> Result<u8> {
    let mut contract = fallback_contract();
    if args.activate {
        contract.activate_initial_phase();
    }
    println!("{}", render_contract(&contract, args.format)?);
    Ok(0)
}
