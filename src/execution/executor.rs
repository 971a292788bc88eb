//! Command executor - runs a step's external tool

use crate::core::step::CommandInvocation;
use crate::execution::error::CommandError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Trait for command execution - allows for different implementations
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the command to completion; Ok only on a zero exit status
    async fn run(&self, invocation: &CommandInvocation) -> Result<(), CommandError>;
}

/// Runs commands as child processes.
///
/// The child inherits stdout/stderr so tool output lands directly in the
/// CI job log.
#[derive(Debug, Clone, Default)]
pub struct SubprocessExecutor;

impl SubprocessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for SubprocessExecutor {
    async fn run(&self, invocation: &CommandInvocation) -> Result<(), CommandError> {
        let command_line = invocation.to_string();
        debug!("Spawning: {}", command_line);

        let mut command = Command::new(&invocation.program);
        command
            .args(invocation.full_args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.workdir {
            command.current_dir(dir);
        }

        let status = match invocation.timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), command.status())
                .await
                .map_err(|_| CommandError::Timeout {
                    command: command_line.clone(),
                    secs,
                })?,
            None => command.status().await,
        }
        .map_err(|source| CommandError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        if !status.success() {
            warn!("{} exited with {:?}", command_line, status.code());
            return Err(CommandError::ExitStatus {
                command: command_line,
                code: status.code(),
            });
        }

        debug!("{} finished successfully", command_line);
        Ok(())
    }
}

/// Logs commands instead of running them
#[derive(Debug, Clone, Default)]
pub struct DryRunExecutor;

#[async_trait]
impl CommandExecutor for DryRunExecutor {
    async fn run(&self, invocation: &CommandInvocation) -> Result<(), CommandError> {
        info!("[dry-run] would run: {}", invocation);
        Ok(())
    }
}
