//! # cerp-core: Foundational Types for the Contract ERP
//!
//! Defines the contract representation exchanged by every other crate in
//! the workspace: a contract, its three lifecycle phases, the milestone
//! actions inside each phase, and the append-only evidence trail attached
//! to each action. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed status vocabularies.** `PhaseName`, `PhaseStatus` and
//!    `ActionStatus` are enums. Locale labels (`INICIO`, `EJECUCION`,
//!    `CIERRE`) and legacy uppercase action statuses are accepted on input
//!    as serde aliases, so one spelling is emitted and several are read.
//!
//! 2. **Lossless pass-through.** Descriptive, audit and ERP-mapping fields
//!    are optional and skipped when absent; unknown fields on the contract,
//!    its phases, actions and evidence are captured in extension maps. A
//!    contract read and written without state changes serializes to the
//!    same JSON object, except that accepted label aliases come back in
//!    canonical form.
//!
//! 3. **UTC-only timestamps.** Evidence produced by this system carries a
//!    `Timestamp` rendered as `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cerp-*` crates (leaf of the DAG).
//! - No behavior that mutates phase or action status: that belongs to
//!   `cerp-state`.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod consistency;
pub mod contract;
pub mod error;
pub mod skeleton;
pub mod temporal;

pub use consistency::ConsistencyIssue;
pub use contract::{
    ActionItem, ActionLocation, ActionStatus, Completion, Contract, Evidence, Phase, PhaseName,
    PhaseStatus, RiskLevel,
};
pub use error::CerpError;
pub use skeleton::{fallback_contract, FALLBACK_CONTRACT_ID};
pub use temporal::Timestamp;
