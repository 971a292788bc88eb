//! release-gate - publish a crate when a release pull request is merged

pub mod cli;
pub mod core;
pub mod execution;
pub mod notify;

// Re-export commonly used types
pub use crate::core::{GateDecision, ReleaseConfig, ReleaseEvent, ReleaseStep, RunOutcome, RunState};
pub use crate::execution::{CommandExecutor, ReleaseError, ReleaseRunner, RunEvent};
pub use crate::notify::{Notifier, NotifyError};
