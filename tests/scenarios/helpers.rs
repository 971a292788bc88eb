//! Test utility functions for release-gate

use async_trait::async_trait;
use release_gate::core::{
    Credential, CommandInvocation, ReleaseConfig, ReleaseEvent, ReleaseStep, RunOutcome,
};
use release_gate::execution::{CommandError, CommandExecutor, ReleaseRunner, RunEvent, RunReport};
use release_gate::notify::{Notifier, NotifyError, PullRequestRef};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A command the mock executor was asked to run
#[derive(Debug, Clone)]
pub struct RecordedCommand {
    pub step: ReleaseStep,
    /// Redacted command line
    pub display: String,
    /// Arguments as the process would have received them
    pub full_args: Vec<String>,
}

/// Executor that records invocations and fails configured steps
#[derive(Clone, Default)]
pub struct MockExecutor {
    calls: Arc<Mutex<Vec<RecordedCommand>>>,
    failures: Arc<HashMap<ReleaseStep, i32>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `step` exit with `code`
    pub fn failing_at(step: ReleaseStep, code: i32) -> Self {
        let mut failures = HashMap::new();
        failures.insert(step, code);
        Self {
            calls: Arc::default(),
            failures: Arc::new(failures),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn steps_run(&self) -> Vec<ReleaseStep> {
        self.calls().iter().map(|c| c.step).collect()
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn run(&self, invocation: &CommandInvocation) -> Result<(), CommandError> {
        self.calls.lock().unwrap().push(RecordedCommand {
            step: invocation.step,
            display: invocation.to_string(),
            full_args: invocation.full_args(),
        });

        match self.failures.get(&invocation.step) {
            Some(code) => Err(CommandError::ExitStatus {
                command: invocation.to_string(),
                code: Some(*code),
            }),
            None => Ok(()),
        }
    }
}

/// Notifier that records comments instead of posting them
#[derive(Clone, Default)]
pub struct MockNotifier {
    comments: Arc<Mutex<Vec<(PullRequestRef, String)>>>,
    reject_with: Option<u16>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the attempt, then fail with an HTTP status
    pub fn rejecting(status: u16) -> Self {
        Self {
            comments: Arc::default(),
            reject_with: Some(status),
        }
    }

    pub fn comments(&self) -> Vec<(PullRequestRef, String)> {
        self.comments.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn post_comment(&self, target: &PullRequestRef, body: &str) -> Result<(), NotifyError> {
        self.comments
            .lock()
            .unwrap()
            .push((target.clone(), body.to_string()));
        match self.reject_with {
            Some(status) => Err(NotifyError::Status {
                status,
                body: "rejected".to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// A merged pull-request event with the given title
pub fn merged_event(title: &str) -> ReleaseEvent {
    ReleaseEvent {
        action: Some("closed".to_string()),
        merged: Some(true),
        title: Some(title.to_string()),
        base_ref: Some("main".to_string()),
        number: Some(42),
        owner: Some("polywrap".to_string()),
        repo: Some("rust-msgpack-serde".to_string()),
    }
}

/// The canonical release trigger
pub fn release_event() -> ReleaseEvent {
    merged_event("Release 1.2.0 /workflows/publish")
}

/// Everything a scenario needs to inspect after a run
pub struct ScenarioResult {
    pub report: RunReport,
    pub executor: MockExecutor,
    pub notifier: MockNotifier,
    pub events: Vec<RunEvent>,
}

impl ScenarioResult {
    pub fn failed_step(&self) -> Option<ReleaseStep> {
        match &self.report.outcome {
            RunOutcome::Failed { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Run `event` through a runner wired to the given mocks
pub async fn run_scenario(
    config: ReleaseConfig,
    event: &ReleaseEvent,
    executor: MockExecutor,
    notifier: MockNotifier,
) -> ScenarioResult {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let mut runner = ReleaseRunner::new(config, executor.clone(), notifier.clone())
        .with_registry_credential(Some(Credential::new("cio_test_token")));
    runner.add_event_handler(move |event| sink.lock().unwrap().push(event.clone()));

    let report = runner.run(event).await;
    let events = events.lock().unwrap().clone();

    ScenarioResult {
        report,
        executor,
        notifier,
        events,
    }
}

/// Run with default config and well-behaved mocks
pub async fn run_default(event: &ReleaseEvent) -> ScenarioResult {
    run_scenario(
        ReleaseConfig::default(),
        event,
        MockExecutor::new(),
        MockNotifier::new(),
    )
    .await
}

/// Assert the run never got past the gate
pub fn assert_nothing_ran(result: &ScenarioResult) {
    assert!(
        matches!(result.report.outcome, RunOutcome::GateRejected(_)),
        "expected gate rejection, got {:?}",
        result.report.outcome
    );
    assert!(result.executor.calls().is_empty(), "executor was invoked");
    assert!(result.notifier.comments().is_empty(), "a comment was posted");
    assert!(result.report.record.steps.is_empty());
}
