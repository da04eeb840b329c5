//! HTTP Chat Forwarder
//!
//! Posts rendered messages to the chat platform's incoming-webhook URL
//! using reqwest. One attempt per message.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use tanuki::{ChatMessage, ChatSink, DomainError};

const USER_AGENT: &str = concat!("tanuki/", env!("CARGO_PKG_VERSION"));

/// HTTP implementation of ChatSink
pub struct HttpForwarder {
    client: Client,
    url: String,
}

impl HttpForwarder {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DomainError::ExternalService(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatSink for HttpForwarder {
    async fn post(&self, message: &ChatMessage) -> Result<(), DomainError> {
        let response = self
            .client
            .post(&self.url)
            .json(message)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "No response body".to_string());
        Err(DomainError::ExternalService(format!(
            "Chat platform returned {status}: {body}"
        )))
    }

    fn name(&self) -> &str {
        "http"
    }
}
