//! Release runner - drives one release from gate to comment

use crate::{
    core::{
        Credential, GateDecision, ReleaseConfig, ReleaseEvent, ReleaseStep, RunOutcome,
        RunRecord, RunState, StepRecord,
    },
    execution::{CommandError, CommandExecutor, ReleaseError},
    notify::{success_comment, Notifier, PullRequestRef},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Events that can occur during a release run
#[derive(Debug, Clone)]
pub enum RunEvent {
    GateEvaluated {
        event_label: String,
        decision: GateDecision,
    },
    RunStarted {
        run_id: Uuid,
        name: String,
    },
    StepStarted {
        step: ReleaseStep,
        /// Redacted command line, or the comment target for notify
        detail: String,
    },
    StepCompleted {
        step: ReleaseStep,
    },
    StepFailed {
        step: ReleaseStep,
        error: String,
    },
    RunFinished {
        run_id: Uuid,
        state: RunState,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&RunEvent) + Send + Sync>;

/// Outcome plus bookkeeping of a finished run
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub record: RunRecord,
}

/// Runs build, doc, publish and notify in order, stopping at the first
/// failure. Nothing is retried or rolled back.
pub struct ReleaseRunner<E, N> {
    config: ReleaseConfig,
    executor: E,
    notifier: N,
    registry_credential: Option<Credential>,
    allow_missing_credential: bool,
    event_handlers: Vec<EventHandler>,
}

impl<E: CommandExecutor, N: Notifier> ReleaseRunner<E, N> {
    pub fn new(config: ReleaseConfig, executor: E, notifier: N) -> Self {
        Self {
            config,
            executor,
            notifier,
            registry_credential: None,
            allow_missing_credential: false,
            event_handlers: Vec::new(),
        }
    }

    /// Credential handed to the publish command
    pub fn with_registry_credential(mut self, credential: Option<Credential>) -> Self {
        self.registry_credential = credential;
        self
    }

    /// Publish without a credential instead of failing (dry runs)
    pub fn allow_missing_credential(mut self, allow: bool) -> Self {
        self.allow_missing_credential = allow;
        self
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&RunEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit(&self, event: RunEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Evaluate the gate and, if it opens, run every step
    pub async fn run(&self, event: &ReleaseEvent) -> RunReport {
        let mut record = RunRecord::new();
        let run_id = record.run_id;

        let decision = self.config.trigger_condition().evaluate(event);
        self.emit(RunEvent::GateEvaluated {
            event_label: event.label(),
            decision: decision.clone(),
        });

        if let GateDecision::Reject(reason) = decision {
            info!("Gate closed for {}: {}", event.label(), reason);
            record.finished_at = Some(Utc::now());
            return RunReport {
                outcome: RunOutcome::GateRejected(reason),
                record,
            };
        }

        info!(
            "Starting release run {} ({}) for {} on {}",
            self.config.name,
            run_id,
            event.label(),
            event.base_ref.as_deref().unwrap_or("unknown branch")
        );
        self.emit(RunEvent::RunStarted {
            run_id,
            name: self.config.name.clone(),
        });

        for step in ReleaseStep::ALL {
            Self::transition(&mut record, RunState::running(step));

            let started_at = Utc::now();
            let result = self.execute_step(step, event).await;
            record.steps.push(StepRecord {
                step,
                started_at,
                finished_at: Utc::now(),
                succeeded: result.is_ok(),
            });

            match result {
                Ok(()) => {
                    info!("Step {} completed", step);
                    self.emit(RunEvent::StepCompleted { step });
                }
                Err(error) => {
                    error!("Step {} failed: {}", step, error);
                    if step == ReleaseStep::Notify {
                        warn!("The release was published; only the comment is missing");
                    }
                    Self::transition(&mut record, RunState::Failed(step));
                    record.finished_at = Some(Utc::now());
                    self.emit(RunEvent::StepFailed {
                        step,
                        error: error.to_string(),
                    });
                    self.emit(RunEvent::RunFinished {
                        run_id,
                        state: record.state,
                    });
                    return RunReport {
                        outcome: RunOutcome::Failed { step, error },
                        record,
                    };
                }
            }
        }

        Self::transition(&mut record, RunState::Done);
        record.finished_at = Some(Utc::now());
        info!("Release run {} published", run_id);
        self.emit(RunEvent::RunFinished {
            run_id,
            state: record.state,
        });

        RunReport {
            outcome: RunOutcome::Published,
            record,
        }
    }

    fn transition(record: &mut RunRecord, to: RunState) {
        if let Err(e) = record.state.advance(to) {
            error!("{}", e);
        }
    }

    /// Execute a single step
    async fn execute_step(&self, step: ReleaseStep, event: &ReleaseEvent) -> Result<(), ReleaseError> {
        // notify is the only step without a command
        let Some(mut invocation) = self.config.invocation(step) else {
            return self.notify(event).await;
        };

        if step == ReleaseStep::Publish {
            match &self.registry_credential {
                Some(credential) => {
                    invocation = invocation
                        .with_secret(self.config.registry.token_flag.clone(), credential.clone());
                }
                None if self.allow_missing_credential => {
                    warn!(
                        "{} is not set; publishing without a token",
                        self.config.registry.token_env
                    );
                }
                None => {
                    let error = CommandError::MissingCredential(self.config.registry.token_env.clone());
                    self.emit(RunEvent::StepStarted {
                        step,
                        detail: invocation.to_string(),
                    });
                    return Err(ReleaseError::PublishFailed(error));
                }
            }
        }

        info!("Running step {}: {}", step, invocation);
        self.emit(RunEvent::StepStarted {
            step,
            detail: invocation.to_string(),
        });

        self.executor
            .run(&invocation)
            .await
            .map_err(|e| ReleaseError::for_command(step, e))
    }

    async fn notify(&self, event: &ReleaseEvent) -> Result<(), ReleaseError> {
        self.emit(RunEvent::StepStarted {
            step: ReleaseStep::Notify,
            detail: format!("comment on {}", event.label()),
        });

        let target = PullRequestRef::from_event(event).map_err(ReleaseError::NotifyFailed)?;
        let body = success_comment(&self.config.notify.message, &self.config.versions_url());

        self.notifier
            .post_comment(&target, &body)
            .await
            .map_err(ReleaseError::NotifyFailed)
    }
}
