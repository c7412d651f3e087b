//! # Application State
//!
//! Shared state for the Axum application: configuration, the milestone
//! workflow, the extraction service, the per-contract lock registry, the
//! in-flight agent counter, and the optional Prometheus handle.
//!
//! Contracts are never stored here. Every request carries its own snapshot
//! and receives the updated snapshot back.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::Mutex;
use tokio::sync::OwnedMutexGuard;

use cerp_agentic::{ExtractionService, MilestoneWorkflow};
use cerp_state::LookupPolicy;

// ─── Configuration ───────────────────────────────────────────────────

/// Log output format for the binary's tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Reject inconsistent phase snapshots instead of ignoring them.
    pub strict_phases: bool,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            strict_phases: false,
            cors_origins: Vec::new(),
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Build configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8000)
    /// - `CERP_STRICT_PHASES` (`1`/`true`/`yes`/`on`, default: off)
    /// - `CERP_CORS_ORIGINS` (comma-separated, default: any origin)
    /// - `CERP_LOG_FORMAT` (`text` or `json`, default: `text`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            strict_phases: lookup("CERP_STRICT_PHASES")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.strict_phases),
            cors_origins: lookup("CERP_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            log_format: match lookup("CERP_LOG_FORMAT").as_deref().map(str::trim) {
                Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }

    pub fn lookup_policy(&self) -> LookupPolicy {
        if self.strict_phases {
            LookupPolicy::Strict
        } else {
            LookupPolicy::Lenient
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ─── Per-contract locks ──────────────────────────────────────────────

/// Keyed async lock registry.
///
/// Serializes evidence submissions that share a `contract_id` so that two
/// concurrent calls can never interleave on the same contract. Entries are
/// removed once no request holds or waits on them.
#[derive(Debug, Clone, Default)]
pub struct ContractLocks {
    inner: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl ContractLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `contract_id`.
    pub async fn acquire(&self, contract_id: &str) -> ContractGuard {
        let lock = {
            let mut map = self.inner.lock();
            map.entry(contract_id.to_string()).or_default().clone()
        };
        let guard = lock.lock_owned().await;
        ContractGuard {
            guard: Some(guard),
            contract_id: contract_id.to_string(),
            registry: self.clone(),
        }
    }

    /// Number of contracts currently locked or awaited.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, contract_id: &str) {
        let mut map = self.inner.lock();
        // Only the map itself still references the mutex: nobody waits.
        if map
            .get(contract_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(contract_id);
        }
    }
}

/// Exclusive access to one contract, released on drop.
#[derive(Debug)]
pub struct ContractGuard {
    guard: Option<OwnedMutexGuard<()>>,
    contract_id: String,
    registry: ContractLocks,
}

impl Drop for ContractGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.registry.release(&self.contract_id);
    }
}

// ─── Agent activity ──────────────────────────────────────────────────

/// Count of workflow invocations currently in flight.
#[derive(Debug, Clone, Default)]
pub struct AgentActivity {
    active: Arc<AtomicUsize>,
}

impl AgentActivity {
    /// Mark one agent busy until the returned guard is dropped.
    pub fn enter(&self) -> ActivityGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        ActivityGuard {
            active: Arc::clone(&self.active),
        }
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct ActivityGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

// ─── AppState ────────────────────────────────────────────────────────

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub workflow: Arc<MilestoneWorkflow>,
    pub extraction: ExtractionService,
    pub locks: ContractLocks,
    pub activity: AgentActivity,
    /// Present when a Prometheus recorder was installed.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("extraction", &self.extraction)
            .field("active_agents", &self.activity.active())
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State with default configuration and no collaborators.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), ExtractionService::new())
    }

    pub fn with_config(config: AppConfig, extraction: ExtractionService) -> Self {
        let workflow = MilestoneWorkflow::with_policy(config.lookup_policy());
        Self {
            config,
            workflow: Arc::new(workflow),
            extraction,
            locks: ContractLocks::new(),
            activity: AgentActivity::default(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
