//! Release step model

use crate::core::credentials::Credential;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The four steps of a release run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStep {
    Build,
    Document,
    Publish,
    Notify,
}

impl ReleaseStep {
    /// All steps in the order they run
    pub const ALL: [ReleaseStep; 4] = [
        ReleaseStep::Build,
        ReleaseStep::Document,
        ReleaseStep::Publish,
        ReleaseStep::Notify,
    ];

    /// 1-based position in the sequence
    pub fn number(self) -> usize {
        match self {
            ReleaseStep::Build => 1,
            ReleaseStep::Document => 2,
            ReleaseStep::Publish => 3,
            ReleaseStep::Notify => 4,
        }
    }

    /// Whether the step runs an external command (every step but notify)
    pub fn is_command(self) -> bool {
        self != ReleaseStep::Notify
    }

    pub fn id(self) -> &'static str {
        match self {
            ReleaseStep::Build => "build",
            ReleaseStep::Document => "doc",
            ReleaseStep::Publish => "publish",
            ReleaseStep::Notify => "notify",
        }
    }
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A fully resolved external command, ready to run
#[derive(Clone)]
pub struct CommandInvocation {
    /// Which step this command belongs to
    pub step: ReleaseStep,

    /// Executable name or path
    pub program: String,

    /// Arguments, not including the secret
    pub args: Vec<String>,

    /// Secret passed as `<flag> <value>` after the regular arguments
    pub secret: Option<(String, Credential)>,

    /// Working directory (None = inherit)
    pub workdir: Option<PathBuf>,

    /// Kill the command after this many seconds (None = no limit)
    pub timeout_secs: Option<u64>,
}

impl CommandInvocation {
    pub fn new(step: ReleaseStep, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            step,
            program: program.into(),
            args,
            secret: None,
            workdir: None,
            timeout_secs: None,
        }
    }

    pub fn with_secret(mut self, flag: impl Into<String>, credential: Credential) -> Self {
        self.secret = Some((flag.into(), credential));
        self
    }

    pub fn with_workdir(mut self, workdir: Option<PathBuf>) -> Self {
        self.workdir = workdir;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Arguments as actually passed to the process, secret included
    pub fn full_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        if let Some((flag, credential)) = &self.secret {
            args.push(flag.clone());
            args.push(credential.expose().to_string());
        }
        args
    }
}

/// Renders the command line with the secret redacted
impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if let Some((flag, credential)) = &self.secret {
            write!(f, " {} {}", flag, credential)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandInvocation")
            .field("step", &self.step)
            .field("command", &self.to_string())
            .field("workdir", &self.workdir)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
