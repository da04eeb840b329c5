//! Fallback for unrecognized event kinds

use super::HookContext;
use crate::domain::entities::ChatMessage;

/// Echo the raw payload of an event nobody formats
///
/// Never fails: the payload is rendered as-is, whatever its shape.
pub fn format_unknown(ctx: &HookContext<'_>, event_type: &str) -> ChatMessage {
    let username = ctx
        .actor()
        .map(|actor| actor.name.clone())
        .unwrap_or_else(|| "gitlab".to_string());

    ChatMessage::new(username)
        .with_icon(ctx.icon_url())
        .with_attachment(
            ctx.attachment(format!("Unknown event `{event_type}` received. Data attached."))
                .author(ctx.actor())
                .build(ctx.received_at),
        )
        .with_attachment(ctx.raw_payload_attachment())
}
