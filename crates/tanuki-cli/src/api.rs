//! Tanuki Server Client

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Reply of the server to a replayed hook
#[derive(Debug)]
pub struct HookReply {
    pub status: StatusCode,
    pub body: String,
}

impl HookReply {
    /// Body as JSON, when there is one
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// API Client for a running tanuki-server
pub struct TanukiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl TanukiClient {
    /// Create a new API client
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        }
    }

    pub fn hook_url(&self) -> String {
        format!("{}/hooks/gitlab", self.base_url)
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Replay a GitLab payload as if GitLab had sent it
    pub async fn send_hook(
        &self,
        event: &str,
        payload: &Value,
        channel: Option<&str>,
    ) -> Result<HookReply> {
        let mut request = self
            .client
            .post(self.hook_url())
            .header("X-Gitlab-Event", event)
            .json(payload);

        if let Some(channel) = channel {
            request = request.query(&[("channel", channel)]);
        }
        if let Some(token) = &self.token {
            request = request.header("X-Gitlab-Token", token);
        }

        let resp = request
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.hook_url()))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        Ok(HookReply { status, body })
    }
}
