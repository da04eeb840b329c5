//! Issue Hook / Confidential Issue Hook

use serde_json::Value;

use super::fields::{display_at, flag, opt_str, str_at};
use super::merge_request::assignee_of;
use super::HookContext;
use crate::domain::entities::ChatMessage;
use crate::domain::errors::DomainError;
use crate::domain::services::{mention, past_tense, MentionSet};
use crate::domain::value_objects::EventKind;

fn labels(payload: &Value) -> Vec<&str> {
    payload
        .get("labels")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(|label| label.get("title").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

pub fn format_issue(ctx: &HookContext<'_>) -> Result<Option<ChatMessage>, DomainError> {
    let payload = ctx.payload;
    let confidential = ctx.kind == Some(EventKind::ConfidentialIssue)
        || flag(payload, "object_attributes.confidential");
    if confidential && ctx.config.ignore_confidential_issues {
        tracing::debug!("Suppressing confidential issue");
        return Ok(None);
    }

    let attributes = payload
        .get("object_attributes")
        .filter(|v| v.is_object())
        .ok_or_else(|| DomainError::missing("object_attributes"))?;
    let project = ctx.project()?;
    let title = str_at(payload, "object_attributes.title")?;
    let verb = match opt_str(attributes, "action") {
        Some(action) => past_tense(action),
        None => str_at(payload, "object_attributes.state")?.to_string(),
    };
    let issue = match (display_at(attributes, "iid"), opt_str(attributes, "url")) {
        (Ok(iid), Some(url)) => format!("[#{iid} {title}]({url})"),
        (Ok(iid), None) => format!("#{iid} {title}"),
        (Err(_), Some(url)) => format!("[{title}]({url})"),
        (Err(_), None) => format!("_{title}_"),
    };

    let mut text = format!("{verb} an issue {issue} on {}.", project.link());
    if let Some(description) = opt_str(attributes, "description") {
        text.push_str(&format!("\n*Description:* {description}"));
    }
    let labels = labels(payload);
    if !labels.is_empty() {
        text.push_str(&format!("\n*Labels:* {}", labels.join(", ")));
    }

    let assignee = assignee_of(attributes, payload);
    if let Some(assignee) = &assignee {
        text.push_str(&format!("\n*Assigned to:* {}", mention(assignee)));
    }

    let mut mentions = MentionSet::new(ctx.actor());
    mentions.insert(assignee.as_ref());

    let message = ctx.project_message()?.with_text(mentions.join()).with_attachment(
        ctx.attachment(text)
            .author(ctx.actor())
            .timestamp(opt_str(attributes, "updated_at"))
            .build(ctx.received_at),
    );

    Ok(Some(message))
}

#[cfg(test)]
mod tests {
    use crate::formatters::test_support::{run, run_with};
    use crate::{DomainError, EventKind, HookConfig};
    use serde_json::{json, Value};

    fn issue_payload() -> Value {
        json!({
            "object_kind": "issue",
            "user": { "name": "Administrator", "username": "root" },
            "project": { "name": "Gitlab Test", "web_url": "http://example.com/gitlabhq/gitlab-test" },
            "object_attributes": {
                "iid": 23,
                "title": "New API: create/update/delete file",
                "description": "Create new API for manipulations with repository",
                "state": "opened",
                "action": "open",
                "url": "http://example.com/diaspora/issues/23",
                "confidential": false
            },
            "labels": [{ "title": "API" }, { "title": "backend" }],
            "assignees": [{ "name": "José Dupont", "username": "jdupont" }]
        })
    }

    #[test]
    fn test_issue_opened() {
        let message = run(EventKind::Issue, &issue_payload()).unwrap();

        assert_eq!(message.username, "gitlab/Gitlab Test");
        assert_eq!(message.text, "@jose.dupont");
        assert_eq!(
            message.attachments[0].text,
            "opened an issue [#23 New API: create/update/delete file](http://example.com/diaspora/issues/23) on [Gitlab Test](http://example.com/gitlabhq/gitlab-test).\n\
             *Description:* Create new API for manipulations with repository\n\
             *Labels:* API, backend\n\
             *Assigned to:* @jose.dupont"
        );
    }

    #[test]
    fn test_issue_without_action_uses_state() {
        let mut payload = issue_payload();
        payload["object_attributes"]["action"] = Value::Null;
        payload["object_attributes"]["state"] = json!("closed");
        let message = run(EventKind::Issue, &payload).unwrap();
        assert!(message.attachments[0].text.starts_with("closed an issue"));
    }

    #[test]
    fn test_self_assigned_issue_has_no_mention() {
        let mut payload = issue_payload();
        payload["assignees"] = json!([{ "name": "Administrator" }]);
        let message = run(EventKind::Issue, &payload).unwrap();
        assert_eq!(message.text, "");
    }

    #[test]
    fn test_confidential_issue_suppression() {
        assert!(run(EventKind::ConfidentialIssue, &issue_payload()).is_none());

        let mut flagged = issue_payload();
        flagged["object_attributes"]["confidential"] = json!(true);
        assert!(run(EventKind::Issue, &flagged).is_none());

        let config = HookConfig::default().with_ignore_confidential(false);
        let shown = run_with(EventKind::ConfidentialIssue, &issue_payload(), &config).unwrap();
        assert!(shown.is_some());
    }

    #[test]
    fn test_missing_title() {
        let mut payload = issue_payload();
        payload["object_attributes"]["title"] = Value::Null;
        let err = run_with(EventKind::Issue, &payload, &HookConfig::default()).unwrap_err();
        assert!(matches!(err, DomainError::MissingField { field } if field == "object_attributes.title"));
    }
}
