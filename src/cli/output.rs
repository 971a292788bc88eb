//! CLI output formatting

use crate::{
    core::{GateDecision, ReleaseStep, RunOutcome, RunState},
    execution::RunEvent,
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Whether a running step gets a spinner. Command steps share stderr with
/// the child process, so only notify does.
pub fn wants_spinner(step: ReleaseStep, dry_run: bool) -> bool {
    !dry_run && !step.is_command()
}

/// Create a spinner for a running step
pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Format a gate decision for display
pub fn format_decision(decision: &GateDecision) -> String {
    match decision {
        GateDecision::Proceed => style("PROCEED").green().to_string(),
        GateDecision::Reject(reason) => format!("{} ({})", style("SKIP").yellow(), reason),
    }
}

/// Format a run state for display
pub fn format_state(state: RunState) -> String {
    match state {
        RunState::Idle => style("IDLE").dim().to_string(),
        RunState::Done => style("DONE").green().to_string(),
        RunState::Failed(step) => style(format!("FAILED at {}", step)).red().to_string(),
        running => style(format!("{:?}", running).to_uppercase()).yellow().to_string(),
    }
}

/// Format a run event for display
pub fn format_run_event(event: &RunEvent) -> String {
    match event {
        RunEvent::GateEvaluated {
            event_label,
            decision,
        } => format!(
            "{} Gate for {}: {}",
            INFO,
            style(event_label).bold(),
            format_decision(decision)
        ),
        RunEvent::RunStarted { run_id, name } => format!(
            "{} Starting {} ({})",
            ROCKET,
            style(name).bold(),
            style(&run_id.to_string()[..8]).dim()
        ),
        RunEvent::StepStarted { step, detail } => format!(
            "{} [{}/4] {} {}",
            SPINNER,
            step.number(),
            style(step).cyan(),
            style(detail).dim()
        ),
        RunEvent::StepCompleted { step } => format!("{} {}", CHECK, style(step).green()),
        RunEvent::StepFailed { step, error } => {
            format!("{} {}: {}", CROSS, style(step).red(), style(error).dim())
        }
        RunEvent::RunFinished { run_id, state } => format!(
            "{} Run ({}) {}",
            INFO,
            style(&run_id.to_string()[..8]).dim(),
            format_state(*state)
        ),
    }
}

/// Final one-line summary of a run
pub fn format_outcome(name: &str, outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::GateRejected(reason) => format!(
            "{} {} skipped: {}",
            WARN,
            style(name).bold(),
            reason
        ),
        RunOutcome::Published => format!(
            "{} {} {}",
            CHECK,
            style(name).bold(),
            style("published").green()
        ),
        RunOutcome::Failed { step, error } => format!(
            "{} {} failed at step {} ({}): {}",
            CROSS,
            style(name).bold(),
            step.number(),
            style(step).red(),
            error
        ),
    }
}
