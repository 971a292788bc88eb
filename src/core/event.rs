//! Release event model - a decoded pull-request-closed notification

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// One pull-request-closed notification from the CI platform.
///
/// Every field is optional: a payload that lacks a field still decodes,
/// and the consumers (the gate, the notifier) decide what absence means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseEvent {
    /// Webhook action (`closed` for the events we care about)
    pub action: Option<String>,

    /// Whether the pull request was merged
    pub merged: Option<bool>,

    /// Pull request title
    pub title: Option<String>,

    /// Base branch the pull request was merged into
    pub base_ref: Option<String>,

    /// Pull request / issue number
    pub number: Option<u64>,

    /// Repository owner login
    pub owner: Option<String>,

    /// Repository name
    pub repo: Option<String>,
}

impl ReleaseEvent {
    /// Load an event from a webhook payload file (e.g. `$GITHUB_EVENT_PATH`)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Decode an event from webhook JSON.
    ///
    /// Only text that is not JSON at all is an error. A field with the
    /// wrong type is treated as absent, so the gate rejects instead of the
    /// run failing.
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: Value = serde_json::from_str(json).context("Event payload is not valid JSON")?;
        Ok(Self::from_value(&payload))
    }

    fn from_value(payload: &Value) -> Self {
        let text = |pointer: &str| {
            payload
                .pointer(pointer)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            action: text("/action"),
            merged: payload.pointer("/pull_request/merged").and_then(Value::as_bool),
            title: text("/pull_request/title"),
            base_ref: text("/pull_request/base/ref"),
            number: payload
                .pointer("/pull_request/number")
                .and_then(Value::as_u64)
                .or_else(|| payload.pointer("/number").and_then(Value::as_u64)),
            owner: text("/repository/owner/login"),
            repo: text("/repository/name"),
        }
    }

    /// Short human label for logs, e.g. `owner/repo#12`
    pub fn label(&self) -> String {
        format!(
            "{}/{}#{}",
            self.owner.as_deref().unwrap_or("?"),
            self.repo.as_deref().unwrap_or("?"),
            self.number.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string())
        )
    }
}
