//! Attachment construction

use chrono::{DateTime, SecondsFormat, Utc};

use super::names::display_name;
use super::text::normalize_timestamp;
use crate::config::HookConfig;
use crate::domain::entities::{Actor, Attachment};

/// Builder for the primary attachment of a message
///
/// Defaults: the configured notification color, and `fallback_ts` when the
/// payload offers no timestamp of its own.
pub struct AttachmentBuilder<'a> {
    config: &'a HookConfig,
    text: String,
    author: Option<&'a Actor>,
    timestamp: Option<String>,
    color: Option<String>,
}

impl<'a> AttachmentBuilder<'a> {
    pub fn new(config: &'a HookConfig, text: impl Into<String>) -> Self {
        Self {
            config,
            text: text.into(),
            author: None,
            timestamp: None,
            color: None,
        }
    }

    pub fn author(mut self, author: Option<&'a Actor>) -> Self {
        self.author = author;
        self
    }

    /// Raw payload timestamp; ignored when `None` or empty
    pub fn timestamp(mut self, raw: Option<&str>) -> Self {
        self.timestamp = raw.filter(|s| !s.is_empty()).map(normalize_timestamp);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn build(self, fallback_ts: DateTime<Utc>) -> Attachment {
        let title = match self.config.attachment_title_length {
            0 => None,
            len => Some(title_prefix(&self.text, len)),
        };

        Attachment {
            author_name: self.author.map(|a| display_name(&a.name)),
            author_icon: self.author.and_then(|a| a.avatar_url.clone()),
            title,
            ts: Some(
                self.timestamp
                    .unwrap_or_else(|| fallback_ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ),
            color: self
                .color
                .unwrap_or_else(|| self.config.notification_color.clone()),
            text: self.text,
        }
    }
}

/// First `len` characters of the text's first line, with ` ...` when cut
fn title_prefix(text: &str, len: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    let mut chars = line.chars();
    let prefix: String = chars.by_ref().take(len).collect();
    if chars.next().is_some() || line.len() < text.trim_end().len() {
        format!("{prefix} ...")
    } else {
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn received() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults_apply() {
        let config = HookConfig::default();
        let attachment = AttachmentBuilder::new(&config, "hello").build(received());

        assert_eq!(attachment.color, "#6498CC");
        assert_eq!(attachment.ts.as_deref(), Some("2024-03-01T10:00:00.000Z"));
        assert!(attachment.title.is_none());
        assert!(attachment.author_name.is_none());
    }

    #[test]
    fn test_author_and_explicit_values() {
        let config = HookConfig::default();
        let actor = Actor::new("José Dupont").with_avatar("http://a/jose.png");
        let attachment = AttachmentBuilder::new(&config, "hello")
            .author(Some(&actor))
            .timestamp(Some("2016-08-12 15:23:28 UTC"))
            .color("#2faa60")
            .build(received());

        assert_eq!(attachment.author_name.as_deref(), Some("jose.dupont"));
        assert_eq!(attachment.author_icon.as_deref(), Some("http://a/jose.png"));
        assert_eq!(attachment.ts.as_deref(), Some("2016-08-12T15:23:28.000Z"));
        assert_eq!(attachment.color, "#2faa60");
    }

    #[test]
    fn test_title_prefix() {
        let config = HookConfig::default().with_title_length(6);
        let cut = AttachmentBuilder::new(&config, "pushed 3 commits").build(received());
        assert_eq!(cut.title.as_deref(), Some("pushed ..."));

        let whole = AttachmentBuilder::new(&config, "merged").build(received());
        assert_eq!(whole.title.as_deref(), Some("merged"));

        let multiline = AttachmentBuilder::new(&config, "merged\nfeature into main").build(received());
        assert_eq!(multiline.title.as_deref(), Some("merged ..."));
    }
}
