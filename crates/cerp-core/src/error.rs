//! # Error Types
//!
//! Errors raised while reading or checking contract snapshots. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//! State machine errors live next to the state machine in `cerp-state`.

use thiserror::Error;

use crate::consistency::ConsistencyIssue;

/// Top-level error type for the data model.
#[derive(Error, Debug)]
pub enum CerpError {
    /// The snapshot violates one or more structural invariants.
    #[error("inconsistent contract {contract_id}: {}", summarize(.issues))]
    Inconsistent {
        /// Identifier of the offending contract.
        contract_id: String,
        /// Every issue found, in detection order.
        issues: Vec<ConsistencyIssue>,
    },

    /// A timestamp could not be parsed.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn summarize(issues: &[ConsistencyIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
