//! Pipeline Hook

use serde_json::Value;

use super::fields::{display_at, opt_seconds, opt_str, str_at};
use super::HookContext;
use crate::domain::entities::{Attachment, ChatMessage};
use crate::domain::errors::DomainError;
use crate::domain::services::truncate_sha;

/// `stage / name: status` for each job of the pipeline
fn job_lines(builds: &[Value]) -> Vec<String> {
    builds
        .iter()
        .map(|build| {
            format!(
                "  - {} / {}: {}",
                opt_str(build, "stage").unwrap_or("?"),
                opt_str(build, "name").unwrap_or("?"),
                opt_str(build, "status").unwrap_or("unknown"),
            )
        })
        .collect()
}

pub fn format_pipeline(ctx: &HookContext<'_>) -> Result<Option<ChatMessage>, DomainError> {
    let payload = ctx.payload;
    let project = ctx.project()?;
    let pipeline_id = display_at(payload, "object_attributes.id")?;
    let status = opt_str(payload, "object_attributes.status");
    let branch = opt_str(payload, "object_attributes.ref");
    let sha = opt_str(payload, "commit.id")
        .or_else(|| opt_str(payload, "object_attributes.sha"))
        .ok_or_else(|| DomainError::missing("commit.id"))?;

    let pipeline = match project.url_for(&format!("pipelines/{pipeline_id}")) {
        Some(url) => format!("[#{pipeline_id}]({url})"),
        None => format!("#{pipeline_id}"),
    };
    let commit = match opt_str(payload, "commit.url") {
        Some(url) => format!("[{}]({url})", truncate_sha(sha)),
        None => truncate_sha(sha).to_string(),
    };

    let mut text = format!(
        "pipeline {pipeline} returned *{}* for commit {commit}",
        status.unwrap_or("unknown")
    );
    if let Ok(author) = str_at(payload, "commit.author.name") {
        text.push_str(&format!(" made by *{author}*"));
    }
    if let Some(branch) = branch {
        text.push_str(&format!(" on `{branch}`"));
    }
    if let Some(duration) = opt_seconds(payload, "object_attributes.duration") {
        text.push_str(&format!(" in {duration}s"));
    }

    let color = ctx.config.status_color(status).to_string();
    let timestamp = opt_str(payload, "object_attributes.finished_at")
        .or_else(|| opt_str(payload, "object_attributes.created_at"));

    let mut message = ctx.project_message()?.with_attachment(
        ctx.attachment(text)
            .author(ctx.actor())
            .timestamp(timestamp)
            .color(color.clone())
            .build(ctx.received_at),
    );

    let builds = payload
        .get("builds")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if !builds.is_empty() {
        message = message.with_attachment(Attachment::plain(job_lines(builds).join("\n"), color));
    }

    Ok(Some(message))
}
