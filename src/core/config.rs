//! Release configuration from YAML
//!
//! Every section is optional; the built-in defaults build, document and
//! publish the workspace with cargo and comment on the pull request via the
//! GitHub API.

use crate::core::step::{CommandInvocation, ReleaseStep};
use crate::core::trigger::{TriggerCondition, DEFAULT_TITLE_SUFFIX};
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_CRATE_NAME: &str = "polywrap_msgpack_serde";
pub const DEFAULT_REGISTRY_URL: &str = "https://crates.io";
pub const DEFAULT_REGISTRY_TOKEN_ENV: &str = "CRATES_IO_TOKEN";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_COMMENT_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const DEFAULT_COMMENT_MESSAGE: &str = "🎉 Successfully published to crates.io!";

/// Top-level release configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Display name for the run
    #[serde(default = "default_name")]
    pub name: String,

    /// Directory the commands run in (defaults to the current directory)
    #[serde(default)]
    pub workdir: Option<PathBuf>,

    #[serde(default)]
    pub trigger: TriggerConfig,

    #[serde(default)]
    pub steps: StepsConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Literal suffix a merged pull request title must end with
    #[serde(default = "default_title_suffix")]
    pub title_suffix: String,
}

/// The three command steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepsConfig {
    #[serde(default = "default_build_command")]
    pub build: CommandConfig,

    #[serde(default = "default_doc_command")]
    pub doc: CommandConfig,

    #[serde(default = "default_publish_command")]
    pub publish: CommandConfig,
}

/// An external command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Optional limit in seconds; no limit when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Package registry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Package linked from the success comment
    #[serde(default = "default_crate_name")]
    pub crate_name: String,

    #[serde(default = "default_registry_url")]
    pub url: String,

    /// Environment variable holding the publish credential
    #[serde(default = "default_registry_token_env")]
    pub token_env: String,

    /// Flag the credential is passed with
    #[serde(default = "default_token_flag")]
    pub token_flag: String,
}

/// Pull request comment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_github_api_url")]
    pub api_url: String,

    /// Environment variable holding the comment token
    #[serde(default = "default_comment_token_env")]
    pub token_env: String,

    /// Fixed text placed before the registry link
    #[serde(default = "default_comment_message")]
    pub message: String,

    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
}

fn default_name() -> String {
    format!("{} release", DEFAULT_CRATE_NAME)
}

fn default_title_suffix() -> String {
    DEFAULT_TITLE_SUFFIX.to_string()
}

fn default_build_command() -> CommandConfig {
    CommandConfig::cargo(&["build", "--release"])
}

fn default_doc_command() -> CommandConfig {
    CommandConfig::cargo(&["doc", "--no-deps"])
}

fn default_publish_command() -> CommandConfig {
    CommandConfig::cargo(&["publish", "--workspace"])
}

fn default_crate_name() -> String {
    DEFAULT_CRATE_NAME.to_string()
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

fn default_registry_token_env() -> String {
    DEFAULT_REGISTRY_TOKEN_ENV.to_string()
}

fn default_token_flag() -> String {
    "--token".to_string()
}

fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

fn default_comment_token_env() -> String {
    DEFAULT_COMMENT_TOKEN_ENV.to_string()
}

fn default_comment_message() -> String {
    DEFAULT_COMMENT_MESSAGE.to_string()
}

fn default_notify_timeout() -> u64 {
    30
}

impl CommandConfig {
    fn cargo(args: &[&str]) -> Self {
        Self {
            program: "cargo".to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout_secs: None,
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            title_suffix: default_title_suffix(),
        }
    }
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            build: default_build_command(),
            doc: default_doc_command(),
            publish: default_publish_command(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            crate_name: default_crate_name(),
            url: default_registry_url(),
            token_env: default_registry_token_env(),
            token_flag: default_token_flag(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api_url(),
            token_env: default_comment_token_env(),
            message: default_comment_message(),
            timeout_secs: default_notify_timeout(),
        }
    }
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            workdir: None,
            trigger: TriggerConfig::default(),
            steps: StepsConfig::default(),
            registry: RegistryConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl ReleaseConfig {
    /// Load release configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse release configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ReleaseConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate the release configuration
    pub fn validate(&self) -> Result<()> {
        if self.trigger.title_suffix.is_empty() {
            anyhow::bail!("trigger.title_suffix must not be empty");
        }

        for (id, command) in [
            ("build", &self.steps.build),
            ("doc", &self.steps.doc),
            ("publish", &self.steps.publish),
        ] {
            if command.program.trim().is_empty() {
                anyhow::bail!("steps.{}.program must not be empty", id);
            }
            if command.timeout_secs == Some(0) {
                anyhow::bail!("steps.{}.timeout_secs must be greater than zero", id);
            }
        }

        let env_name = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")?;
        for (field, var) in [
            ("registry.token_env", &self.registry.token_env),
            ("notify.token_env", &self.notify.token_env),
        ] {
            if !env_name.is_match(var) {
                anyhow::bail!("{} '{}' is not a valid environment variable name", field, var);
            }
        }

        let crate_name = Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$")?;
        if !crate_name.is_match(&self.registry.crate_name) {
            anyhow::bail!(
                "registry.crate_name '{}' is not a valid crate name",
                self.registry.crate_name
            );
        }

        if self.registry.token_flag.trim().is_empty() {
            anyhow::bail!("registry.token_flag must not be empty");
        }

        if !(self.registry.url.starts_with("https://") || self.registry.url.starts_with("http://")) {
            anyhow::bail!("registry.url '{}' must be an http(s) URL", self.registry.url);
        }

        // carries the comment token: https, or http on loopback only
        let api_url = reqwest::Url::parse(&self.notify.api_url)
            .with_context(|| format!("notify.api_url '{}' is not a valid URL", self.notify.api_url))?;
        let secure = match api_url.scheme() {
            "https" => true,
            "http" => api_url.host_str().is_some_and(is_loopback_host),
            _ => false,
        };
        if !secure {
            anyhow::bail!(
                "notify.api_url '{}' must be an https URL (http is allowed for loopback hosts only)",
                self.notify.api_url
            );
        }

        if self.notify.timeout_secs == 0 {
            anyhow::bail!("notify.timeout_secs must be greater than zero");
        }

        Ok(())
    }

    /// The gate built from this configuration
    pub fn trigger_condition(&self) -> TriggerCondition {
        TriggerCondition::new(self.trigger.title_suffix.clone())
    }

    /// Registry page listing the published versions
    pub fn versions_url(&self) -> String {
        format!(
            "{}/crates/{}/versions",
            self.registry.url.trim_end_matches('/'),
            self.registry.crate_name
        )
    }

    /// Command configured for a step (Notify has none)
    pub fn command(&self, step: ReleaseStep) -> Option<&CommandConfig> {
        match step {
            ReleaseStep::Build => Some(&self.steps.build),
            ReleaseStep::Document => Some(&self.steps.doc),
            ReleaseStep::Publish => Some(&self.steps.publish),
            ReleaseStep::Notify => None,
        }
    }

    /// Resolve a step's command without its secret
    pub fn invocation(&self, step: ReleaseStep) -> Option<CommandInvocation> {
        self.command(step).map(|command| {
            CommandInvocation::new(step, command.program.clone(), command.args.clone())
                .with_workdir(self.workdir.clone())
                .with_timeout(command.timeout_secs)
        })
    }
}

fn is_loopback_host(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    host.eq_ignore_ascii_case("localhost")
        || host.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}
