//! # HTTP Middleware
//!
//! - `metrics`: Prometheus recorder installation and per-request counters.
//!
//! Request tracing uses `tower_http::trace::TraceLayer` directly.

pub mod metrics;
