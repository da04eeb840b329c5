//! Inbound Event Entity
//!
//! One GitLab webhook delivery, as handed over by the transport layer.

use chrono::{DateTime, Utc};

/// A webhook delivery waiting to be rendered
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// Value of the `X-Gitlab-Event` header
    pub event_type: String,
    /// Raw JSON body
    pub payload: serde_json::Value,
    /// Destination override from the `channel` query parameter
    pub channel: Option<String>,
    /// When the delivery was received; default attachment timestamp
    pub received_at: DateTime<Utc>,
}

impl InboundEvent {
    /// Create a new event received now
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
            channel: None,
            received_at: Utc::now(),
        }
    }

    /// Set the channel override; blank values are ignored
    pub fn with_channel(mut self, channel: Option<String>) -> Self {
        self.channel = channel.filter(|c| !c.trim().is_empty());
        self
    }

    /// Set the receive timestamp
    pub fn with_received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = received_at;
        self
    }
}
