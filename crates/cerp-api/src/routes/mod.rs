//! # API Route Modules
//!
//! - `contracts`: contract analysis (`/analyze-contract`) and milestone
//!   evidence checks (`/check-milestone`).
//! - `service`: service banner (`/`), agent activity (`/agent-status`),
//!   and the Prometheus scrape endpoint (`/metrics`).

pub mod contracts;
pub mod service;
