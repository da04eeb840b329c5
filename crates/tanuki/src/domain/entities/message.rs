//! Chat Message Entities
//!
//! Documents produced for the chat platform's incoming-webhook API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message posted to the chat platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// Display name of the posting bot, e.g. `gitlab/my-project`
    pub username: String,
    /// Avatar of the post; omitted to use the platform default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Top-level text, usually empty or a list of mentions
    #[serde(default)]
    pub text: String,
    /// Destination override (`#channel` or `@user`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Styled block inside a chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_icon: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// ISO-8601 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    /// Hex color of the side bar, e.g. `#6498CC`
    pub color: String,
}

/// Error object returned instead of a message when formatting fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorReport {
    /// Always `false`
    pub success: bool,
    pub message: String,
    /// Diagnostic text; omitted when error messages are suppressed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl ChatMessage {
    /// Create a message with no attachments
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            icon_url: None,
            text: String::new(),
            channel: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon_url: Option<String>) -> Self {
        self.icon_url = icon_url;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

impl Attachment {
    /// Attachment without author or timestamp, used for secondary blocks
    pub fn plain(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            author_name: None,
            author_icon: None,
            text: text.into(),
            title: None,
            ts: None,
            color: color.into(),
        }
    }
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let message = ChatMessage::new("gitlab/demo")
            .with_attachment(Attachment::plain("hello", "#6498CC"));
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "username": "gitlab/demo",
                "text": "",
                "attachments": [{ "text": "hello", "color": "#6498CC" }]
            })
        );
    }

    #[test]
    fn test_error_report_shape() {
        let json = serde_json::to_value(ErrorReport::new("boom")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "message": "boom" }));
    }
}
