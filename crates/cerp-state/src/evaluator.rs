//! # Evidence Evaluator
//!
//! Decides whether a submitted piece of evidence satisfies an action item
//! and, when it does, completes the action.
//!
//! ## Decision policy
//!
//! [`KeywordJudge`] is a placeholder for a model-backed reviewer: evidence
//! is accepted when its lowercased text contains `done`, `completo`, or
//! `https://` (a link is taken as proof). The action's `criteria` is not
//! matched mechanically. Replace the judge, not the evaluator, to change
//! the policy.
//!
//! ## Effects
//!
//! | input                          | decision     | mutation                            |
//! |--------------------------------|--------------|-------------------------------------|
//! | no action, or blank evidence   | INSUFFICIENT | none                                |
//! | judge says MET                 | MET          | status → completed, evidence appended |
//! | judge says INSUFFICIENT        | INSUFFICIENT | none                                |

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cerp_core::{ActionItem, ActionStatus, Evidence, Timestamp};

/// Response when the action or the evidence text is absent.
pub const MSG_MISSING_INPUT: &str = "No action or evidence provided";
/// Response when the evidence completed the milestone.
pub const MSG_COMPLETED: &str = "Milestone COMPLETED based on evidence.";
/// Response when the evidence was not accepted.
pub const MSG_INSUFFICIENT: &str = "Evidence insufficient. Please provide more details.";

// ─── Decision ────────────────────────────────────────────────────────

/// Outcome of judging evidence against an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// The action's completion criteria are satisfied.
    Met,
    /// The evidence does not establish completion.
    Insufficient,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Met => "MET",
            Self::Insufficient => "INSUFFICIENT",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Judge ───────────────────────────────────────────────────────────

/// Strategy deciding whether evidence satisfies an action's criteria.
pub trait EvidenceJudge: Send + Sync {
    fn judge(&self, criteria: &str, evidence: &str) -> Decision;
}

impl<J: EvidenceJudge + ?Sized> EvidenceJudge for Arc<J> {
    fn judge(&self, criteria: &str, evidence: &str) -> Decision {
        (**self).judge(criteria, evidence)
    }
}

impl<J: EvidenceJudge + ?Sized> EvidenceJudge for Box<J> {
    fn judge(&self, criteria: &str, evidence: &str) -> Decision {
        (**self).judge(criteria, evidence)
    }
}

/// Substring heuristic: MET when any marker occurs in the lowercased
/// evidence text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordJudge {
    markers: Vec<String>,
}

impl KeywordJudge {
    /// Markers used by [`KeywordJudge::default`].
    pub const DEFAULT_MARKERS: [&'static str; 3] = ["done", "completo", "https://"];

    /// Build a judge from custom markers. Markers are lowercased; blank
    /// markers are dropped since they would match everything.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.as_ref().trim().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

impl Default for KeywordJudge {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MARKERS)
    }
}

impl EvidenceJudge for KeywordJudge {
    fn judge(&self, _criteria: &str, evidence: &str) -> Decision {
        let text = evidence.to_lowercase();
        if self.markers.iter().any(|m| text.contains(m.as_str())) {
            Decision::Met
        } else {
            Decision::Insufficient
        }
    }
}

// ─── Evaluator ───────────────────────────────────────────────────────

/// Result of one evaluation: the decision and the human-readable response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub decision: Decision,
    pub message: String,
}

impl Evaluation {
    fn new(decision: Decision, message: &str) -> Self {
        Self {
            decision,
            message: message.to_string(),
        }
    }
}

/// Applies an [`EvidenceJudge`] to an action and records the outcome.
#[derive(Debug, Clone, Default)]
pub struct EvidenceEvaluator<J = KeywordJudge> {
    judge: J,
}

impl<J: EvidenceJudge> EvidenceEvaluator<J> {
    pub fn new(judge: J) -> Self {
        Self { judge }
    }

    pub fn judge(&self) -> &J {
        &self.judge
    }

    /// Evaluate `evidence` against `action`, stamping any recorded evidence
    /// with the current time.
    pub fn evaluate(&self, action: Option<&mut ActionItem>, evidence: Option<&str>) -> Evaluation {
        self.evaluate_at(action, evidence, Timestamp::now())
    }

    /// Evaluate with an explicit recording time.
    ///
    /// A missing action or blank evidence text is a caller-contract
    /// violation: it yields INSUFFICIENT with [`MSG_MISSING_INPUT`] and
    /// leaves the action untouched.
    pub fn evaluate_at(
        &self,
        action: Option<&mut ActionItem>,
        evidence: Option<&str>,
        recorded_at: Timestamp,
    ) -> Evaluation {
        let (action, text) = match (action, evidence) {
            (Some(action), Some(text)) if !text.trim().is_empty() => (action, text),
            _ => return Evaluation::new(Decision::Insufficient, MSG_MISSING_INPUT),
        };

        match self.judge.judge(&action.criteria, text) {
            Decision::Met => {
                action.status = ActionStatus::Completed;
                action.evidence.push(Evidence::new(
                    text,
                    first_https_url(text),
                    recorded_at.to_iso8601(),
                ));
                tracing::debug!(action_id = %action.id, "evidence accepted, action completed");
                Evaluation::new(Decision::Met, MSG_COMPLETED)
            }
            Decision::Insufficient => {
                tracing::debug!(action_id = %action.id, "evidence insufficient");
                Evaluation::new(Decision::Insufficient, MSG_INSUFFICIENT)
            }
        }
    }
}

/// First `https://` link in free text, without trailing punctuation.
fn first_https_url(text: &str) -> Option<String> {
    text.split_whitespace().find_map(|token| {
        let start = token.to_ascii_lowercase().find("https://")?;
        let url = token[start..]
            .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ')' | ']' | '"' | '\''));
        (url.len() > "https://".len()).then(|| url.to_string())
    })
}

// ─── Tests ───────────────────────────────────────────────────────────
