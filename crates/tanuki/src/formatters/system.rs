//! System Hook
//!
//! Instance-level events. `event_name` is `<entity>_<action>[_<rest>]`
//! (`project_create`, `user_add_to_team`...). System hooks also carry
//! ordinary push, tag push and merge request payloads; those are handed to
//! the project formatters.

use super::fields::{opt_str, str_at};
use super::{merge_request, push, tag, HookContext};
use crate::domain::entities::ChatMessage;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::EventKind;

fn preposition(action: &str) -> &'static str {
    match action {
        "remove" => "from",
        "update" => "in",
        _ => "to",
    }
}

/// Human-readable sentence for a system event
fn describe(ctx: &HookContext<'_>, event_name: &str) -> Result<String, DomainError> {
    let payload = ctx.payload;
    let mut parts = event_name.splitn(3, '_');
    let entity = parts.next().unwrap_or("");
    let action = parts.next().unwrap_or("");
    let scope = parts.next().unwrap_or("");
    let verb = ctx.config.action_verb(action).unwrap_or(action);
    let field = |name: &str| str_at(payload, name);

    let text = match (entity, action, scope) {
        ("project", "create" | "destroy" | "update", "") => {
            format!("Project `{}` was {verb}.", field("path_with_namespace")?)
        }
        ("project", "rename" | "transfer", "") => format!(
            "Project `{}` was {verb} to `{}`.",
            field("old_path_with_namespace")?,
            field("path_with_namespace")?
        ),
        ("user", "add" | "update", "to_team" | "for_team") => format!(
            "User `{}` was {verb} {} project `{}` with `{}` access.",
            field("user_username")?,
            preposition(action),
            field("project_path_with_namespace")?,
            field("project_access")?
        ),
        ("user", "remove", "from_team") => format!(
            "User `{}` was {verb} from project `{}`.",
            field("user_username")?,
            field("project_path_with_namespace")?
        ),
        ("user", "add" | "update", "to_group" | "for_group") => format!(
            "User `{}` was {verb} {} group `{}` with `{}` access.",
            field("user_username")?,
            preposition(action),
            field("group_path")?,
            field("group_access")?
        ),
        ("user", "remove", "from_group") => format!(
            "User `{}` was {verb} from group `{}`.",
            field("user_username")?,
            field("group_path")?
        ),
        ("user", "create" | "destroy", "") => {
            format!("User `{}` was {verb}.", field("username")?)
        }
        ("user", "rename", "") => format!(
            "User `{}` was {verb} to `{}`.",
            field("old_username")?,
            field("username")?
        ),
        ("key", "create" | "destroy", "") => {
            format!("SSH key of user `{}` was {verb}.", field("username")?)
        }
        ("group", "create" | "destroy", "") => {
            let path = opt_str(payload, "full_path")
                .map(Ok)
                .unwrap_or_else(|| field("path"))?;
            format!("Group `{path}` was {verb}.")
        }
        ("group", "rename", "") => format!(
            "Group `{}` was {verb} to `{}`.",
            field("old_full_path")?,
            field("full_path")?
        ),
        _ => format!("Unknown system event `{event_name}`."),
    };

    Ok(text)
}

pub fn format_system(ctx: &HookContext<'_>) -> Result<Option<ChatMessage>, DomainError> {
    let payload = ctx.payload;
    let event_name = opt_str(payload, "event_name").or_else(|| opt_str(payload, "object_kind"));

    let delegated = match event_name {
        Some("push") => Some(push::format_push(&ctx.as_kind(EventKind::Push))?),
        Some("tag_push") => Some(tag::format_tag_push(&ctx.as_kind(EventKind::TagPush))?),
        Some("merge_request") => Some(merge_request::format_merge_request(
            &ctx.as_kind(EventKind::MergeRequest),
        )?),
        _ => None,
    };
    if let Some(message) = delegated {
        return Ok(message.map(|m| m.with_attachment(ctx.raw_payload_attachment())));
    }

    let event_name = event_name.ok_or_else(|| DomainError::missing("event_name"))?;
    let text = describe(ctx, event_name)?;

    let message = ChatMessage::new("gitlab")
        .with_icon(ctx.icon_url())
        .with_attachment(ctx.attachment(text).build(ctx.received_at))
        .with_attachment(ctx.raw_payload_attachment());

    Ok(Some(message))
}

#[cfg(test)]
mod tests {
    use crate::formatters::test_support::{run, run_with};
    use crate::{DomainError, EventKind, HookConfig};
    use serde_json::{json, Value};

    fn describe(payload: Value) -> String {
        let message = run(EventKind::System, &payload).unwrap();
        assert_eq!(message.attachments.len(), 2, "raw payload is attached");
        message.attachments[0].text.clone()
    }

    #[test]
    fn test_project_events() {
        assert_eq!(
            describe(json!({
                "event_name": "project_create",
                "name": "StoreCloud",
                "path_with_namespace": "jsmith/storecloud"
            })),
            "Project `jsmith/storecloud` was created."
        );
        assert_eq!(
            describe(json!({
                "event_name": "project_transfer",
                "path_with_namespace": "scores/underscore",
                "old_path_with_namespace": "jsmith/overscore"
            })),
            "Project `jsmith/overscore` was transferred to `scores/underscore`."
        );
    }

    #[test]
    fn test_user_events() {
        assert_eq!(
            describe(json!({
                "event_name": "user_add_to_team",
                "user_username": "johnsmith",
                "project_path_with_namespace": "jsmith/storecloud",
                "project_access": "Master"
            })),
            "User `johnsmith` was added to project `jsmith/storecloud` with `Master` access."
        );
        assert_eq!(
            describe(json!({
                "event_name": "user_remove_from_group",
                "user_username": "johnsmith",
                "group_path": "storecloud"
            })),
            "User `johnsmith` was removed from group `storecloud`."
        );
        assert_eq!(
            describe(json!({
                "event_name": "user_rename",
                "username": "new-exciting-name",
                "old_username": "johnsmith"
            })),
            "User `johnsmith` was renamed to `new-exciting-name`."
        );
    }

    #[test]
    fn test_key_and_group_events() {
        assert_eq!(
            describe(json!({ "event_name": "key_destroy", "username": "root", "id": 4 })),
            "SSH key of user `root` was removed."
        );
        assert_eq!(
            describe(json!({ "event_name": "group_create", "path": "storecloud", "full_path": "acme/storecloud" })),
            "Group `acme/storecloud` was created."
        );
        assert_eq!(
            describe(json!({
                "event_name": "group_rename",
                "old_full_path": "acme/old",
                "full_path": "acme/new"
            })),
            "Group `acme/old` was renamed to `acme/new`."
        );
    }

    #[test]
    fn test_unknown_system_event() {
        assert_eq!(
            describe(json!({ "event_name": "repository_update" })),
            "Unknown system event `repository_update`."
        );
    }

    #[test]
    fn test_system_push_is_delegated() {
        let payload = json!({
            "event_name": "push",
            "before": "95790bf891e76fee5e1747ab589903a6a1f80f22",
            "ref": "refs/heads/master",
            "checkout_sha": "da1560886d4f094c3e6c9ef40349f7d38b5d27d7",
            "user_name": "John Smith",
            "project": { "name": "Example", "web_url": "http://example.com/jsmith/example" },
            "commits": [],
            "total_commits_count": 0
        });
        let message = run(EventKind::System, &payload).unwrap();
        assert_eq!(message.username, "gitlab/Example");
        assert!(message.attachments[0].text.starts_with("pushed 0 commits to branch"));
        let raw = &message.attachments.last().unwrap().text;
        assert!(raw.contains("\"event_name\""));
    }

    #[test]
    fn test_missing_template_field() {
        let payload = json!({ "event_name": "project_create" });
        let err = run_with(EventKind::System, &payload, &HookConfig::default()).unwrap_err();
        assert!(matches!(err, DomainError::MissingField { field } if field == "path_with_namespace"));
    }
}
