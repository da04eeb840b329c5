//! GitLab Event Formatters
//!
//! One pure function per event kind, each turning a payload into a
//! [`ChatMessage`]. `Ok(None)` means the event is recognized but suppressed
//! by policy.

mod build;
pub mod fields;
mod issue;
mod merge_request;
mod note;
mod pipeline;
mod push;
mod system;
mod tag;
mod unknown;
mod wiki;

pub use unknown::format_unknown;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::HookConfig;
use crate::domain::entities::{Actor, Attachment, ChatMessage, Project};
use crate::domain::errors::DomainError;
use crate::domain::services::AttachmentBuilder;
use crate::domain::value_objects::EventKind;

/// Formatter signature shared by every event kind
pub type Formatter = fn(&HookContext<'_>) -> Result<Option<ChatMessage>, DomainError>;

/// Dispatch table from event kind to formatter
pub fn formatter_for(kind: EventKind) -> Formatter {
    match kind {
        EventKind::Push => push::format_push,
        EventKind::TagPush => tag::format_tag_push,
        EventKind::MergeRequest => merge_request::format_merge_request,
        EventKind::Note | EventKind::ConfidentialNote => note::format_note,
        EventKind::Issue | EventKind::ConfidentialIssue => issue::format_issue,
        EventKind::Pipeline => pipeline::format_pipeline,
        EventKind::Build => build::format_build,
        EventKind::WikiPage => wiki::format_wiki_page,
        EventKind::System => system::format_system,
    }
}

/// Everything a formatter may look at
///
/// `actor` and `project` are normalized once, before any formatter runs.
pub struct HookContext<'a> {
    pub kind: Option<EventKind>,
    pub payload: &'a Value,
    pub actor: Option<Actor>,
    pub project: Option<Project>,
    pub config: &'a HookConfig,
    pub received_at: DateTime<Utc>,
}

impl<'a> HookContext<'a> {
    pub fn new(
        kind: Option<EventKind>,
        payload: &'a Value,
        config: &'a HookConfig,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            payload,
            actor: Actor::from_payload(payload),
            project: Project::from_payload(payload),
            config,
            received_at,
        }
    }

    /// Same payload seen as another event kind (system hook delegation)
    pub fn as_kind(&self, kind: EventKind) -> HookContext<'a> {
        HookContext {
            kind: Some(kind),
            payload: self.payload,
            actor: self.actor.clone(),
            project: self.project.clone(),
            config: self.config,
            received_at: self.received_at,
        }
    }

    pub fn project(&self) -> Result<&Project, DomainError> {
        self.project
            .as_ref()
            .ok_or_else(|| DomainError::missing("project.name"))
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    /// `gitlab/<project>` bot name
    pub fn username(&self) -> Result<String, DomainError> {
        Ok(format!("gitlab/{}", self.project()?.name))
    }

    /// First available avatar: project, actor, configured default
    pub fn icon_url(&self) -> Option<String> {
        if self.config.use_platform_default_avatar {
            return None;
        }
        self.project
            .as_ref()
            .and_then(|p| p.avatar_url.clone())
            .or_else(|| self.actor.as_ref().and_then(|a| a.avatar_url.clone()))
            .or_else(|| self.config.default_avatar_url.clone())
    }

    /// Attachment builder preset with this context's configuration
    pub fn attachment(&self, text: impl Into<String>) -> AttachmentBuilder<'_> {
        AttachmentBuilder::new(self.config, text)
    }

    /// Secondary attachment echoing the raw payload
    pub fn raw_payload_attachment(&self) -> Attachment {
        let pretty = serde_json::to_string_pretty(self.payload)
            .unwrap_or_else(|_| self.payload.to_string());
        Attachment::plain(pretty, self.config.notification_color.clone())
    }

    /// Message skeleton with the project bot name and avatar
    pub fn project_message(&self) -> Result<ChatMessage, DomainError> {
        Ok(ChatMessage::new(self.username()?).with_icon(self.icon_url()))
    }
}
