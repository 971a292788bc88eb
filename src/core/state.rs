//! Run state machine and outcome

use crate::core::step::ReleaseStep;
use crate::core::trigger::RejectReason;
use crate::execution::ReleaseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a release run currently is.
///
/// `Idle → Building → Documenting → Publishing → Notifying → Done`, with
/// any step able to drop into `Failed`. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Building,
    Documenting,
    Publishing,
    Notifying,
    Done,
    Failed(ReleaseStep),
}

/// Attempted an out-of-order transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid transition from {from:?} to {to:?}")]
pub struct InvalidTransition {
    pub from: RunState,
    pub to: RunState,
}

impl RunState {
    /// The state entered while `step` runs
    pub fn running(step: ReleaseStep) -> Self {
        match step {
            ReleaseStep::Build => RunState::Building,
            ReleaseStep::Document => RunState::Documenting,
            ReleaseStep::Publish => RunState::Publishing,
            ReleaseStep::Notify => RunState::Notifying,
        }
    }

    /// The step running in this state, if any
    pub fn step(&self) -> Option<ReleaseStep> {
        match self {
            RunState::Building => Some(ReleaseStep::Build),
            RunState::Documenting => Some(ReleaseStep::Document),
            RunState::Publishing => Some(ReleaseStep::Publish),
            RunState::Notifying => Some(ReleaseStep::Notify),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed(_))
    }

    /// Successor on success
    fn next(&self) -> Option<RunState> {
        match self {
            RunState::Idle => Some(RunState::Building),
            RunState::Building => Some(RunState::Documenting),
            RunState::Documenting => Some(RunState::Publishing),
            RunState::Publishing => Some(RunState::Notifying),
            RunState::Notifying => Some(RunState::Done),
            RunState::Done | RunState::Failed(_) => None,
        }
    }

    /// Move to `to`, rejecting anything but the linear successor or a
    /// failure of the step currently running.
    pub fn advance(&mut self, to: RunState) -> Result<(), InvalidTransition> {
        let allowed = match to {
            RunState::Failed(step) => self.step() == Some(step),
            _ => self.next() == Some(to),
        };
        if !allowed {
            return Err(InvalidTransition { from: *self, to });
        }
        *self = to;
        Ok(())
    }
}

/// Record of one step that ran
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: ReleaseStep,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub succeeded: bool,
}

/// Terminal result of a release run
#[derive(Debug)]
pub enum RunOutcome {
    /// The event did not match the trigger; nothing ran
    GateRejected(RejectReason),
    /// All four steps succeeded
    Published,
    /// The first failing step halted the run
    Failed {
        step: ReleaseStep,
        error: ReleaseError,
    },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Failed { .. })
    }

    /// Process exit code for this outcome.
    ///
    /// A failed step reports the tool's own exit code when it has one.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::GateRejected(_) | RunOutcome::Published => 0,
            RunOutcome::Failed { error, .. } => error.exit_code(),
        }
    }
}

/// Bookkeeping for a single run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: Uuid,
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<StepRecord>,
}

impl RunRecord {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            state: RunState::Idle,
            started_at: Utc::now(),
            finished_at: None,
            steps: Vec::new(),
        }
    }

    /// Steps that ran, in order
    pub fn executed_steps(&self) -> Vec<ReleaseStep> {
        self.steps.iter().map(|r| r.step).collect()
    }
}

impl Default for RunRecord {
    fn default() -> Self {
        Self::new()
    }
}
