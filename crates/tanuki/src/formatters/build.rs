//! Build Hook / Job Hook

use super::fields::{display_at, opt_seconds, opt_str};
use super::HookContext;
use crate::domain::entities::ChatMessage;
use crate::domain::errors::DomainError;
use crate::domain::services::truncate_sha;

pub fn format_build(ctx: &HookContext<'_>) -> Result<Option<ChatMessage>, DomainError> {
    let payload = ctx.payload;
    let project = ctx.project()?;
    let build_id = display_at(payload, "build_id")?;
    let name = opt_str(payload, "build_name").unwrap_or("job");
    let stage = opt_str(payload, "build_stage");
    let status = opt_str(payload, "build_status");

    let job = match project.url_for(&format!("-/jobs/{build_id}")) {
        Some(url) => format!("[{name}]({url})"),
        None => name.to_string(),
    };

    let mut text = format!("job {job}");
    if let Some(stage) = stage {
        text.push_str(&format!(" in stage *{stage}*"));
    }
    text.push_str(&format!(" returned *{}*", status.unwrap_or("unknown")));
    if let Some(branch) = opt_str(payload, "ref") {
        text.push_str(&format!(" on `{branch}`"));
    }
    if let Some(sha) = opt_str(payload, "sha").or_else(|| opt_str(payload, "commit.sha")) {
        let short = truncate_sha(sha);
        match project.url_for(&format!("commit/{sha}")) {
            Some(url) => text.push_str(&format!(" ([{short}]({url}))")),
            None => text.push_str(&format!(" ({short})")),
        }
    }
    if let Some(duration) = opt_seconds(payload, "build_duration") {
        text.push_str(&format!(" in {duration}s"));
    }

    let timestamp = opt_str(payload, "build_finished_at")
        .or_else(|| opt_str(payload, "build_started_at"));

    let message = ctx.project_message()?.with_attachment(
        ctx.attachment(text)
            .author(ctx.actor())
            .timestamp(timestamp)
            .color(ctx.config.status_color(status))
            .build(ctx.received_at),
    );

    Ok(Some(message))
}
