//! # cerp-cli: Operator CLI for Contract Snapshots
//!
//! Provides the `cerp` command-line interface for working with contract
//! snapshots on disk, outside the HTTP service.
//!
//! ## Subcommands
//!
//! - `cerp validate`: Structural consistency report.
//! - `cerp evidence`: Judge evidence for one action and advance phases.
//! - `cerp advance`: Run the phase transition manager alone.
//! - `cerp status`: Phase and action table with completion counts.
//! - `cerp skeleton`: Print the fallback contract.
//!
//! Contract files are JSON or YAML, chosen by file extension:
//!
//! ```bash
//! cerp validate contract.json
//! cerp evidence contract.yaml --action ACT-01 --evidence "Acta firmada" --out next.yaml
//! cerp status next.yaml
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `*Args` structs; handlers take parsed args.
//! - Handlers return a process exit code and delegate all contract logic
//!   to `cerp-core`, `cerp-state` and `cerp-agentic`.

pub mod contract_io;
pub mod milestone;
pub mod skeleton;
pub mod status;
pub mod validate;
