//! Trigger evaluation - decides whether a closed pull request is a release

use crate::core::event::ReleaseEvent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title suffix that marks a pull request as a release trigger
pub const DEFAULT_TITLE_SUFFIX: &str = "/workflows/publish";

/// Why the gate did not open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The event is missing a field the gate needs
    MissingField(String),
    /// The pull request was closed without merging
    NotMerged,
    /// The title does not end with the release marker
    TitleMismatch,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingField(field) => write!(f, "event has no '{}' field", field),
            RejectReason::NotMerged => write!(f, "pull request was not merged"),
            RejectReason::TitleMismatch => write!(f, "title does not end with the release marker"),
        }
    }
}

/// Outcome of evaluating the gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateDecision {
    Proceed,
    Reject(RejectReason),
}

impl GateDecision {
    pub fn proceeds(&self) -> bool {
        matches!(self, GateDecision::Proceed)
    }
}

/// The release trigger condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerCondition {
    /// Exact, case-sensitive suffix the title must end with
    pub title_suffix: String,
}

impl Default for TriggerCondition {
    fn default() -> Self {
        Self {
            title_suffix: DEFAULT_TITLE_SUFFIX.to_string(),
        }
    }
}

impl TriggerCondition {
    pub fn new(title_suffix: impl Into<String>) -> Self {
        Self {
            title_suffix: title_suffix.into(),
        }
    }

    /// Proceed iff the pull request was merged and its title ends with the suffix.
    ///
    /// No trimming or case folding is applied to the title.
    pub fn evaluate(&self, event: &ReleaseEvent) -> GateDecision {
        let Some(merged) = event.merged else {
            return GateDecision::Reject(RejectReason::MissingField("merged".to_string()));
        };
        let Some(title) = event.title.as_deref() else {
            return GateDecision::Reject(RejectReason::MissingField("title".to_string()));
        };

        if !merged {
            return GateDecision::Reject(RejectReason::NotMerged);
        }
        if !title.ends_with(self.title_suffix.as_str()) {
            return GateDecision::Reject(RejectReason::TitleMismatch);
        }

        GateDecision::Proceed
    }
}
