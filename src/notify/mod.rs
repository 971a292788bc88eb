//! Pull request notification after a successful publish

pub mod github;

use crate::core::event::ReleaseEvent;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tracing::info;

pub use github::GitHubNotifier;

/// Error types for notification
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("comment API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("comment token not set: environment variable {0} is empty or missing")]
    MissingCredential(String),

    #[error("event has no {0}; cannot address the pull request")]
    IncompleteEvent(&'static str),
}

/// Pull request a comment is posted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    pub fn from_event(event: &ReleaseEvent) -> Result<Self, NotifyError> {
        Ok(Self {
            owner: event
                .owner
                .clone()
                .ok_or(NotifyError::IncompleteEvent("repository owner"))?,
            repo: event
                .repo
                .clone()
                .ok_or(NotifyError::IncompleteEvent("repository name"))?,
            number: event
                .number
                .ok_or(NotifyError::IncompleteEvent("pull request number"))?,
        })
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Posts a comment on a pull request
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post_comment(&self, target: &PullRequestRef, body: &str) -> Result<(), NotifyError>;
}

/// Logs the comment instead of posting it
#[derive(Debug, Clone, Default)]
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn post_comment(&self, target: &PullRequestRef, body: &str) -> Result<(), NotifyError> {
        info!("[dry-run] would comment on {}: {}", target, body);
        Ok(())
    }
}

/// Body of the success comment: the fixed message followed by the link to
/// the registry's version listing.
pub fn success_comment(message: &str, versions_url: &str) -> String {
    format!("{}\n\n{}", message, versions_url)
}
