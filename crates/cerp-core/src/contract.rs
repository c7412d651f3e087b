//! # Contract Data Model
//!
//! The structured contract produced by extraction and carried through the
//! milestone state machine.
//!
//! ```text
//! Contract
//!  ├── parties: [String]
//!  ├── current_phase: PhaseName
//!  └── phases: [Phase; 3]  (INITIATION, EXECUTION, CLOSURE)
//!        └── actions: [ActionItem]
//!              └── evidence: [Evidence]   (append-only)
//! ```
//!
//! The contract is the sole owner of its phases and actions; neither has an
//! identity outside it. Phase order inside `phases` is load-bearing: the
//! transition manager walks the fixed `PhaseName` sequence.

use serde::{Deserialize, Deserializer, Serialize};

// ─── Phase Name ──────────────────────────────────────────────────────

/// One of the three fixed lifecycle stages of a contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum PhaseName {
    /// Start-up obligations: signatures, kick-off records, work plans.
    #[default]
    #[serde(rename = "INITIATION", alias = "INICIO")]
    Initiation,
    /// Delivery of the contracted work.
    #[serde(rename = "EXECUTION", alias = "EJECUCION", alias = "EJECUCIÓN")]
    Execution,
    /// Acceptance, liquidation and hand-over.
    #[serde(rename = "CLOSURE", alias = "CIERRE")]
    Closure,
}

impl PhaseName {
    /// The fixed phase sequence, in order.
    pub const SEQUENCE: [PhaseName; 3] = [Self::Initiation, Self::Execution, Self::Closure];

    /// The phase that follows this one, or `None` for CLOSURE.
    pub fn next(&self) -> Option<PhaseName> {
        match self {
            Self::Initiation => Some(Self::Execution),
            Self::Execution => Some(Self::Closure),
            Self::Closure => None,
        }
    }

    /// Zero-based position in [`PhaseName::SEQUENCE`].
    pub fn position(&self) -> usize {
        match self {
            Self::Initiation => 0,
            Self::Execution => 1,
            Self::Closure => 2,
        }
    }

    /// Canonical wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiation => "INITIATION",
            Self::Execution => "EXECUTION",
            Self::Closure => "CLOSURE",
        }
    }
}

impl std::fmt::Display for PhaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Phase Status ────────────────────────────────────────────────────

/// Status of a phase. At most one phase is ACTIVE at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PhaseStatus {
    /// Not yet opened.
    #[default]
    #[serde(rename = "PENDING", alias = "pending")]
    Pending,
    /// The phase currently open.
    #[serde(rename = "ACTIVE", alias = "active")]
    Active,
    /// Closed: every action in it was completed.
    #[serde(rename = "COMPLETED", alias = "completed")]
    Completed,
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
        };
        f.write_str(s)
    }
}

// ─── Action Status ───────────────────────────────────────────────────

/// Status of a milestone action.
///
/// Serialized in the lowercase form the dashboards consume. The uppercase
/// forms written by older agents are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionStatus {
    #[default]
    #[serde(rename = "pending", alias = "PENDING")]
    Pending,
    #[serde(
        rename = "in-progress",
        alias = "in_progress",
        alias = "IN_PROGRESS",
        alias = "IN-PROGRESS"
    )]
    InProgress,
    #[serde(rename = "completed", alias = "COMPLETED")]
    Completed,
    /// Blocked or running late.
    #[serde(
        rename = "delayed",
        alias = "DELAYED",
        alias = "blocked",
        alias = "BLOCKED"
    )]
    Delayed,
}

impl ActionStatus {
    /// Whether the action has reached its terminal status.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Delayed => "delayed",
        };
        f.write_str(s)
    }
}

/// Risk level assigned by the audit agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "bajo", alias = "low")]
    Bajo,
    #[serde(rename = "medio", alias = "medium")]
    Medio,
    #[serde(rename = "alto", alias = "high")]
    Alto,
}

// ─── Evidence ────────────────────────────────────────────────────────

/// One submitted proof for an action. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// The raw evidence text judged by the evaluator.
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// When the evidence was recorded. Free-form for caller-supplied records.
    #[serde(default)]
    pub timestamp: String,

    /// Fields not modelled above, preserved verbatim.
    #[serde(flatten)]
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

impl Evidence {
    pub fn new(description: impl Into<String>, url: Option<String>, timestamp: String) -> Self {
        Self {
            description: description.into(),
            url,
            timestamp,
            extensions: serde_json::Map::new(),
        }
    }
}

// ─── Action Item ─────────────────────────────────────────────────────

/// A milestone obligation inside a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    /// Unique within the contract; the lookup key for evidence submissions.
    pub id: String,
    pub description: String,
    /// Natural-language success condition, informational for reviewers.
    pub criteria: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(default)]
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_value: Option<String>,
    #[serde(default)]
    pub deliverables: Vec<String>,
    /// Append-only evidence log.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub evidence: Vec<Evidence>,

    /// Fields not modelled above, preserved verbatim.
    #[serde(flatten)]
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

impl ActionItem {
    /// A pending action with no optional metadata.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        criteria: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            criteria: criteria.into(),
            insight: None,
            citation: None,
            status: ActionStatus::Pending,
            due_date: None,
            milestone_value: None,
            deliverables: Vec::new(),
            evidence: Vec::new(),
            extensions: serde_json::Map::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}

// ─── Phase ───────────────────────────────────────────────────────────

/// One lifecycle stage and the actions that must complete to close it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: PhaseName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub actions: Vec<ActionItem>,
    #[serde(default)]
    pub status: PhaseStatus,

    /// Fields not modelled above, preserved verbatim.
    #[serde(flatten)]
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

impl Phase {
    /// A pending phase.
    pub fn new(name: PhaseName, description: impl Into<String>, actions: Vec<ActionItem>) -> Self {
        Self {
            name,
            description: Some(description.into()),
            actions,
            status: PhaseStatus::Pending,
            extensions: serde_json::Map::new(),
        }
    }

    /// Whether every action is completed. Vacuously true for an empty phase.
    pub fn all_actions_completed(&self) -> bool {
        self.actions.iter().all(ActionItem::is_completed)
    }
}

// ─── Contract ────────────────────────────────────────────────────────

/// Position of an action inside a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionLocation {
    pub phase_index: usize,
    pub action_index: usize,
}

/// Completed versus total action counts across all phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub completed: usize,
    pub total: usize,
}

impl Completion {
    /// Whole-number percentage; 100 for a contract with no actions.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed * 100) / self.total) as u32
    }
}

/// A contract snapshot.
///
/// Only `phases[*].status`, `current_phase` and the actions' `status` and
/// `evidence` are written by the state machine. Every other field is
/// pass-through data and round-trips unchanged, including fields this
/// model does not know about (kept in `extensions`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Externally assigned, immutable identifier.
    pub contract_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Extraction model's reasoning about the ERP mapping and phase split.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_process: Option<String>,

    // ERP mapping (inferred from the knowledge base during extraction).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp_vendor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp_cost_center: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp_material_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp_purchasing_org: Option<String>,

    #[serde(default)]
    pub parties: Vec<String>,
    #[serde(default)]
    pub phases: Vec<Phase>,
    #[serde(default)]
    pub current_phase: PhaseName,

    // Audit layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_insights: Option<Vec<String>>,

    // Dashboard sync fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_manager_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,

    /// Fields not modelled above, preserved verbatim.
    #[serde(flatten)]
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

impl Contract {
    /// A contract with the given phases and no pass-through metadata.
    /// `current_phase` starts at INITIATION.
    pub fn new(contract_id: impl Into<String>, parties: Vec<String>, phases: Vec<Phase>) -> Self {
        Self {
            contract_id: contract_id.into(),
            title: None,
            summary: None,
            thought_process: None,
            erp_vendor_id: None,
            erp_cost_center: None,
            erp_material_group: None,
            erp_purchasing_org: None,
            parties,
            phases,
            current_phase: PhaseName::Initiation,
            audit_summary: None,
            audit_insights: None,
            client: None,
            contract_type: None,
            status: None,
            progress: None,
            value: None,
            start_date: None,
            end_date: None,
            location: None,
            health: None,
            risk_level: None,
            project_manager_id: None,
            pdf_url: None,
            extensions: serde_json::Map::new(),
        }
    }

    /// Index of the first phase with the given name.
    pub fn phase_index(&self, name: PhaseName) -> Option<usize> {
        self.phases.iter().position(|p| p.name == name)
    }

    /// First phase with the given name.
    pub fn phase(&self, name: PhaseName) -> Option<&Phase> {
        self.phases.iter().find(|p| p.name == name)
    }

    /// Index of the phase named by `current_phase`.
    pub fn current_phase_index(&self) -> Option<usize> {
        self.phase_index(self.current_phase)
    }

    /// Locate an action by id. Scans phases in order, then actions in
    /// order; the first match wins when ids are duplicated.
    pub fn locate_action(&self, action_id: &str) -> Option<ActionLocation> {
        self.phases
            .iter()
            .enumerate()
            .find_map(|(phase_index, phase)| {
                phase
                    .actions
                    .iter()
                    .position(|a| a.id == action_id)
                    .map(|action_index| ActionLocation {
                        phase_index,
                        action_index,
                    })
            })
    }

    /// First action with the given id.
    pub fn find_action(&self, action_id: &str) -> Option<&ActionItem> {
        self.locate_action(action_id)
            .and_then(|loc| self.action_at(loc))
    }

    pub fn action_at(&self, loc: ActionLocation) -> Option<&ActionItem> {
        self.phases
            .get(loc.phase_index)
            .and_then(|p| p.actions.get(loc.action_index))
    }

    pub fn action_at_mut(&mut self, loc: ActionLocation) -> Option<&mut ActionItem> {
        self.phases
            .get_mut(loc.phase_index)
            .and_then(|p| p.actions.get_mut(loc.action_index))
    }

    /// All actions across all phases, in phase order.
    pub fn actions(&self) -> impl Iterator<Item = &ActionItem> {
        self.phases.iter().flat_map(|p| p.actions.iter())
    }

    /// Completed versus total actions.
    pub fn completion(&self) -> Completion {
        let (completed, total) = self.actions().fold((0, 0), |(done, all), a| {
            (done + usize::from(a.is_completed()), all + 1)
        });
        Completion { completed, total }
    }

    /// Fully closed: CLOSURE is current and COMPLETED.
    pub fn is_closed(&self) -> bool {
        self.current_phase == PhaseName::Closure
            && self
                .phase(PhaseName::Closure)
                .is_some_and(|p| p.status == PhaseStatus::Completed)
    }

    /// Open the current phase on a freshly extracted contract.
    ///
    /// Applies only when no phase is ACTIVE or COMPLETED yet. Returns
    /// whether a phase was activated.
    pub fn activate_initial_phase(&mut self) -> bool {
        let untouched = self
            .phases
            .iter()
            .all(|p| p.status == PhaseStatus::Pending);
        if !untouched {
            return false;
        }
        match self.current_phase_index() {
            Some(idx) => {
                self.phases[idx].status = PhaseStatus::Active;
                true
            }
            None => false,
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ─── Tests ───────────────────────────────────────────────────────────
