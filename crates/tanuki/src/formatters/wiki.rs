//! Wiki Page Hook

use super::fields::{opt_str, str_at};
use super::HookContext;
use crate::domain::entities::ChatMessage;
use crate::domain::errors::DomainError;

pub fn format_wiki_page(ctx: &HookContext<'_>) -> Result<Option<ChatMessage>, DomainError> {
    let payload = ctx.payload;
    let project = ctx.project()?;
    let title = str_at(payload, "object_attributes.title")?;
    let action = opt_str(payload, "object_attributes.action").unwrap_or("");
    let verb = ctx.config.action_verb(action).unwrap_or("modified");

    // A removed page no longer resolves, so it is not linked
    let removed = matches!(action, "delete" | "destroy");
    let page = match opt_str(payload, "object_attributes.url") {
        Some(url) if !removed => format!("[{title}]({url})"),
        _ => title.to_string(),
    };

    let mut text = format!("{verb} wiki page {page} on {}", project.link());
    if let Some(note) = opt_str(payload, "object_attributes.message") {
        text.push_str(&format!("\n*Message:* {note}"));
    }

    let message = ctx.project_message()?.with_attachment(
        ctx.attachment(text)
            .author(ctx.actor())
            .build(ctx.received_at),
    );

    Ok(Some(message))
}
