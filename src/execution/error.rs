//! Error types for release steps

use crate::core::step::ReleaseStep;
use crate::notify::NotifyError;
use thiserror::Error;

/// Failure of an external command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {}", describe_code(.code))]
    ExitStatus { command: String, code: Option<i32> },

    #[error("'{command}' timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },

    #[error("credential not set: environment variable {0} is empty or missing")]
    MissingCredential(String),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl CommandError {
    /// Exit code reported by the tool, if it exited on its own
    pub fn tool_exit_code(&self) -> Option<i32> {
        match self {
            CommandError::ExitStatus { code, .. } => *code,
            _ => None,
        }
    }
}

/// A fatal release step failure
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("build failed: {0}")]
    BuildFailed(#[source] CommandError),

    #[error("doc generation failed: {0}")]
    DocFailed(#[source] CommandError),

    #[error("publish failed: {0}")]
    PublishFailed(#[source] CommandError),

    #[error("notify failed: {0}")]
    NotifyFailed(#[source] NotifyError),
}

impl ReleaseError {
    /// Wrap a command failure in the error for its step.
    ///
    /// Notify runs no command, so it must never reach this.
    pub fn for_command(step: ReleaseStep, error: CommandError) -> Self {
        debug_assert!(step.is_command(), "{} has no command to fail", step);
        match step {
            ReleaseStep::Build => ReleaseError::BuildFailed(error),
            ReleaseStep::Document => ReleaseError::DocFailed(error),
            ReleaseStep::Publish | ReleaseStep::Notify => ReleaseError::PublishFailed(error),
        }
    }

    pub fn step(&self) -> ReleaseStep {
        match self {
            ReleaseError::BuildFailed(_) => ReleaseStep::Build,
            ReleaseError::DocFailed(_) => ReleaseStep::Document,
            ReleaseError::PublishFailed(_) => ReleaseStep::Publish,
            ReleaseError::NotifyFailed(_) => ReleaseStep::Notify,
        }
    }

    /// Process exit code: the failing tool's own code when it has a
    /// non-zero one, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        let tool_code = match self {
            ReleaseError::BuildFailed(e)
            | ReleaseError::DocFailed(e)
            | ReleaseError::PublishFailed(e) => e.tool_exit_code(),
            ReleaseError::NotifyFailed(_) => None,
        };
        match tool_code {
            Some(code) if code != 0 => code,
            _ => 1,
        }
    }
}
