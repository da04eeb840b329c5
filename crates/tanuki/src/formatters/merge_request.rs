//! Merge Request Hook

use serde_json::Value;

use super::fields::{display_at, object_at, opt_str, str_at};
use super::HookContext;
use crate::domain::entities::{Actor, ChatMessage};
use crate::domain::errors::DomainError;
use crate::domain::services::{past_tense, MentionSet};

/// Assignee of a merge request, wherever this GitLab version put it
pub(super) fn assignee_of(attributes: &Value, payload: &Value) -> Option<Actor> {
    object_at(attributes, "assignee")
        .or_else(|| object_at(payload, "assignee"))
        .and_then(Actor::from_value)
        .or_else(|| {
            payload
                .get("assignees")
                .and_then(Value::as_array)
                .and_then(|all| all.first())
                .and_then(Actor::from_value)
        })
}

/// Author of the merge request's last commit
pub(super) fn last_commit_author(attributes: &Value) -> Option<Actor> {
    object_at(attributes, "last_commit.author").and_then(Actor::from_value)
}

pub fn format_merge_request(ctx: &HookContext<'_>) -> Result<Option<ChatMessage>, DomainError> {
    let payload = ctx.payload;
    let mr = payload
        .get("object_attributes")
        .filter(|v| v.is_object())
        .ok_or_else(|| DomainError::missing("object_attributes"))?;

    let action = opt_str(mr, "action")
        .or_else(|| opt_str(mr, "state"))
        .ok_or_else(|| DomainError::missing("object_attributes.action"))?;
    let iid = display_at(mr, "iid").map_err(|_| DomainError::missing("object_attributes.iid"))?;
    let title = str_at(mr, "title").map_err(|_| DomainError::missing("object_attributes.title"))?;
    let source = opt_str(mr, "source_branch").unwrap_or("?");
    let target = opt_str(mr, "target_branch").unwrap_or("?");

    let mut mentions = MentionSet::new(ctx.actor());
    match action {
        "open" => {
            mentions.insert(assignee_of(mr, payload).as_ref());
        }
        "merge" => {
            mentions.insert(assignee_of(mr, payload).as_ref());
            mentions.insert(last_commit_author(mr).as_ref());
        }
        _ => {}
    }

    let link = match opt_str(mr, "url") {
        Some(url) => format!("[!{iid} {title}]({url})"),
        None => format!("!{iid} {title}"),
    };
    let text = format!(
        "{} MR {link}\n`{source}` into `{target}`",
        past_tense(action)
    );

    let message = ctx.project_message()?.with_text(mentions.join()).with_attachment(
        ctx.attachment(text)
            .author(ctx.actor())
            .timestamp(opt_str(mr, "updated_at"))
            .build(ctx.received_at),
    );

    Ok(Some(message))
}

#[cfg(test)]
mod tests {
    use crate::formatters::test_support::{run, run_with};
    use crate::{DomainError, EventKind, HookConfig};
    use serde_json::{json, Value};

    fn mr_payload(action: &str) -> Value {
        json!({
            "object_kind": "merge_request",
            "user": { "name": "Administrator", "username": "root", "avatar_url": "http://a/root.png" },
            "project": { "name": "Gitlab Test", "web_url": "http://example.com/gitlabhq/gitlab-test" },
            "object_attributes": {
                "iid": 1,
                "title": "MS-Viewport",
                "url": "http://example.com/diaspora/merge_requests/1",
                "action": action,
                "state": "opened",
                "source_branch": "ms-viewport",
                "target_branch": "master",
                "updated_at": "2013-12-03T17:23:34Z",
                "last_commit": {
                    "id": "da1560886d4f094c3e6c9ef40349f7d38b5d27d7",
                    "author": { "name": "GitLab dev user" }
                },
                "target": { "name": "Gitlab Test", "avatar_url": "http://a/target.png" }
            },
            "assignees": [{ "name": "User1", "username": "user1" }]
        })
    }

    #[test]
    fn test_open_mentions_assignee() {
        let message = run(EventKind::MergeRequest, &mr_payload("open")).unwrap();

        assert_eq!(message.username, "gitlab/Gitlab Test");
        assert_eq!(message.text, "@user1");
        assert_eq!(
            message.attachments[0].text,
            "opened MR [!1 MS-Viewport](http://example.com/diaspora/merge_requests/1)\n`ms-viewport` into `master`"
        );
        assert_eq!(message.attachments[0].ts.as_deref(), Some("2013-12-03T17:23:34.000Z"));
    }

    #[test]
    fn test_merge_mentions_assignee_and_last_commit_author() {
        let message = run(EventKind::MergeRequest, &mr_payload("merge")).unwrap();
        assert_eq!(message.text, "@user1 @gitlab.dev.user");
    }

    #[test]
    fn test_merge_mentions_are_deduplicated() {
        let mut payload = mr_payload("merge");
        payload["assignees"] = json!([{ "name": "GitLab Dev User" }]);
        let message = run(EventKind::MergeRequest, &payload).unwrap();
        assert_eq!(message.text, "@gitlab.dev.user");
    }

    #[test]
    fn test_merge_by_assignee_does_not_self_mention() {
        let mut payload = mr_payload("merge");
        payload["assignees"] = json!([{ "name": "Administrator" }]);
        payload["object_attributes"]["last_commit"]["author"] = json!({ "name": "Administrator" });
        let message = run(EventKind::MergeRequest, &payload).unwrap();
        assert_eq!(message.text, "");
    }

    #[test]
    fn test_update_has_no_mentions() {
        let message = run(EventKind::MergeRequest, &mr_payload("update")).unwrap();
        assert_eq!(message.text, "");
        assert!(message.attachments[0].text.starts_with("updated MR"));
    }

    #[test]
    fn test_missing_attributes() {
        let payload = json!({ "project": { "name": "x" } });
        let err = run_with(EventKind::MergeRequest, &payload, &HookConfig::default()).unwrap_err();
        assert!(matches!(err, DomainError::MissingField { field } if field == "object_attributes"));
    }
}
