//! Tag Push Hook

use super::fields::{opt_str, str_at};
use super::HookContext;
use crate::domain::entities::ChatMessage;
use crate::domain::errors::DomainError;
use crate::domain::services::{parse_ref, truncate_sha};

pub fn format_tag_push(ctx: &HookContext<'_>) -> Result<Option<ChatMessage>, DomainError> {
    let payload = ctx.payload;
    let project = ctx.project()?;
    let tag = parse_ref(str_at(payload, "ref")?);
    let message = ctx.project_message()?;

    // A deleted tag has no checkout target
    let Some(sha) = opt_str(payload, "checkout_sha") else {
        let attachment = ctx
            .attachment(format!("removed tag {tag} from {}", project.link()))
            .author(ctx.actor())
            .build(ctx.received_at);
        return Ok(Some(message.with_attachment(attachment)));
    };

    let short = truncate_sha(sha);
    let label = match project.url_for(&format!("tags/{tag}")) {
        Some(url) => format!("[{tag} {short}]({url})"),
        None => format!("{tag} {short}"),
    };
    let mut text = format!("pushed tag {label} to {}", project.link());
    if let Some(annotation) = opt_str(payload, "message") {
        text.push('\n');
        text.push_str(annotation.trim_end());
    }

    let mention = if ctx.config.mention_all_allowed {
        "@all"
    } else {
        ""
    };

    Ok(Some(
        message.with_text(mention).with_attachment(
            ctx.attachment(text)
                .author(ctx.actor())
                .build(ctx.received_at),
        ),
    ))
}
