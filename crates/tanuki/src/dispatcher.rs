//! Event Dispatcher
//!
//! Entry point of the library: reads the event discriminator, runs the
//! matching formatter and turns every failure into an [`ErrorReport`].
//! Nothing raised by a formatter, panics included, escapes [`Dispatcher::route`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use serde_json::Value;

use crate::config::HookConfig;
use crate::domain::entities::{Attachment, ChatMessage, ErrorReport, InboundEvent};
use crate::domain::errors::DomainError;
use crate::domain::services::AttachmentBuilder;
use crate::domain::value_objects::EventKind;
use crate::formatters::{format_unknown, formatter_for, HookContext};

/// Result of routing one event
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Rendered chat message
    Message(ChatMessage),
    /// Formatting failed; `notice` is the diagnostic message to post, if any
    Failed {
        report: ErrorReport,
        notice: Option<ChatMessage>,
    },
    /// Suppressed by configuration
    Ignored,
}

impl Outcome {
    /// Message to deliver to the chat platform, if any
    pub fn deliverable(&self) -> Option<&ChatMessage> {
        match self {
            Self::Message(message) => Some(message),
            Self::Failed { notice, .. } => notice.as_ref(),
            Self::Ignored => None,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }

    /// Output document: message JSON, error JSON, or `null`
    pub fn to_json(&self) -> Value {
        match self {
            Self::Message(message) => to_value(message),
            Self::Failed {
                notice: Some(notice),
                ..
            } => to_value(notice),
            Self::Failed { report, .. } => to_value(report),
            Self::Ignored => Value::Null,
        }
    }

    pub fn into_json(self) -> Value {
        self.to_json()
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// `#name` for a bare channel name; `#...` and `@...` are kept as given
fn channel_target(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with('#') || raw.starts_with('@') {
        raw.to_string()
    } else {
        format!("#{raw}")
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("formatter panicked: {detail}")
}

/// Routes inbound events to formatters
///
/// Holds the process-wide configuration; cheap to share behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: HookConfig,
}

impl Dispatcher {
    pub fn new(config: HookConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Render one event
    pub fn route(&self, event: &InboundEvent) -> Outcome {
        let kind = match event.event_type.parse::<EventKind>() {
            Ok(kind) => Some(kind),
            Err(err) if self.config.ignore_unknown_events => {
                tracing::debug!(event = %event.event_type, error = %err, "Ignoring unknown event");
                return Outcome::Ignored;
            }
            Err(_) => {
                tracing::info!(event = %event.event_type, "Unknown event, echoing payload");
                None
            }
        };

        self.guarded(event, kind, |ctx| match kind {
            Some(kind) => formatter_for(kind)(ctx),
            None => Ok(Some(format_unknown(ctx, &event.event_type))),
        })
    }

    /// Run `format` with panics and errors converted to `Outcome::Failed`
    fn guarded<F>(&self, event: &InboundEvent, kind: Option<EventKind>, format: F) -> Outcome
    where
        F: FnOnce(&HookContext<'_>) -> Result<Option<ChatMessage>, DomainError>,
    {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let ctx = HookContext::new(kind, &event.payload, &self.config, event.received_at);
            format(&ctx)
        }))
        .unwrap_or_else(|payload| Err(DomainError::Internal(panic_message(payload))));

        match result {
            Ok(Some(message)) => {
                tracing::debug!(event = %event.event_type, "Event rendered");
                Outcome::Message(self.apply_channel(message, event))
            }
            Ok(None) => {
                tracing::debug!(event = %event.event_type, "Event suppressed by configuration");
                Outcome::Ignored
            }
            Err(err) => self.failure(event, err),
        }
    }

    fn failure(&self, event: &InboundEvent, err: DomainError) -> Outcome {
        tracing::warn!(
            event = %event.event_type,
            malformed = err.is_malformed_payload(),
            error = %err,
            "Failed to render event"
        );

        let report = ErrorReport::new(err.to_string());
        if self.config.ignore_error_messages {
            return Outcome::Failed {
                report,
                notice: None,
            };
        }

        let report = report.with_trace(format!("{err:?}"));
        let icon = if self.config.use_platform_default_avatar {
            None
        } else {
            self.config.default_avatar_url.clone()
        };
        let notice = ChatMessage::new("gitlab")
            .with_icon(icon)
            .with_attachment(
                AttachmentBuilder::new(
                    &self.config,
                    format!(
                        "Error while handling `{}` event. Details attached.",
                        event.event_type
                    ),
                )
                .color(self.config.error_color.clone())
                .build(event.received_at),
            )
            .with_attachment(Attachment::plain(
                format!("{}\n{}", report.message, report.trace.as_deref().unwrap_or("")),
                self.config.error_color.clone(),
            ));

        Outcome::Failed {
            report,
            notice: Some(self.apply_channel(notice, event)),
        }
    }

    fn apply_channel(&self, message: ChatMessage, event: &InboundEvent) -> ChatMessage {
        match &event.channel {
            Some(channel) => message.with_channel(channel_target(channel)),
            None => message,
        }
    }
}
