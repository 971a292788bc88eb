//! GitHub issue comment client

use crate::core::config::NotifyConfig;
use crate::core::credentials::Credential;
use crate::notify::{Notifier, NotifyError, PullRequestRef};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
struct CreateComment<'a> {
    body: &'a str,
}

/// Posts comments through the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubNotifier {
    client: Client,
    api_url: String,
    token_env: String,
    token: Option<Credential>,
}

impl GitHubNotifier {
    /// Create a notifier; `token` is the comment-scoped credential
    pub fn new(config: &NotifyConfig, token: Option<Credential>) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .user_agent(concat!("release-gate/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token_env: config.token_env.clone(),
            token,
        })
    }

    /// Issue comments endpoint for a pull request
    pub fn comments_url(&self, target: &PullRequestRef) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, target.owner, target.repo, target.number
        )
    }
}

#[async_trait]
impl Notifier for GitHubNotifier {
    async fn post_comment(&self, target: &PullRequestRef, body: &str) -> Result<(), NotifyError> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| NotifyError::MissingCredential(self.token_env.clone()))?;

        let url = self.comments_url(target);
        debug!(%url, "Posting pull request comment");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.expose())
            .header("Accept", "application/vnd.github+json")
            .json(&CreateComment { body })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Comment on {} rejected with {}", target, status);
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("Commented on {}", target);
        Ok(())
    }
}
