//! # Contract File I/O
//!
//! Reads and writes contract snapshots as JSON or YAML. The format is
//! picked from the file extension: `.yaml` and `.yml` are YAML, anything
//! else is JSON.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use cerp_core::Contract;

/// Serialization format of a contract file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContractFormat {
    Json,
    Yaml,
}

impl ContractFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Load a contract snapshot from `path`.
pub fn read_contract(path: &Path) -> Result<Contract> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read contract file: {}", path.display()))?;
    let contract = match ContractFormat::from_path(path) {
        ContractFormat::Yaml => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML contract: {}", path.display()))?,
        ContractFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON contract: {}", path.display()))?,
    };
    tracing::debug!(path = %path.display(), "loaded contract");
    Ok(contract)
}

/// Render a contract in the given format.
pub fn render_contract(contract: &Contract, format: ContractFormat) -> Result<String> {
    let text = match format {
        ContractFormat::Json => serde_json::to_string_pretty(contract)?,
        ContractFormat::Yaml => serde_yaml::to_string(contract)?,
    };
    Ok(text)
}

/// Write a contract to `out`, or pretty JSON to stdout when `out` is `None`.
pub fn write_contract(contract: &Contract, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            let text = render_contract(contract, ContractFormat::from_path(path))?;
            std::fs::write(path, text)
                .with_context(|| format!("failed to write contract file: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "wrote contract");
        }
        None => println!("{}", render_contract(contract, ContractFormat::Json)?),
    }
    Ok(())
}
