//! Note Hook (comments)

use serde_json::Value;

use super::fields::{display_at, object_at, opt_str, str_at};
use super::merge_request::{assignee_of, last_commit_author};
use super::HookContext;
use crate::domain::entities::{Actor, ChatMessage};
use crate::domain::errors::DomainError;
use crate::domain::services::{summary_line, truncate_sha, MentionSet};
use crate::domain::value_objects::EventKind;

/// Object a comment was left on
enum Parent<'a> {
    MergeRequest(&'a Value),
    Commit(&'a Value),
    Issue(&'a Value),
    Snippet(&'a Value),
    Other(&'a str),
}

fn parent_of(payload: &Value) -> Parent<'_> {
    if let Some(mr) = object_at(payload, "merge_request") {
        Parent::MergeRequest(mr)
    } else if let Some(commit) = object_at(payload, "commit") {
        Parent::Commit(commit)
    } else if let Some(issue) = object_at(payload, "issue") {
        Parent::Issue(issue)
    } else if let Some(snippet) = object_at(payload, "snippet") {
        Parent::Snippet(snippet)
    } else {
        Parent::Other(opt_str(payload, "object_attributes.noteable_type").unwrap_or("something"))
    }
}

fn link(label: String, url: &str) -> String {
    if url.is_empty() {
        label
    } else {
        format!("[{label}]({url})")
    }
}

pub fn format_note(ctx: &HookContext<'_>) -> Result<Option<ChatMessage>, DomainError> {
    if ctx.kind == Some(EventKind::ConfidentialNote) && ctx.config.ignore_confidential_issues {
        tracing::debug!("Suppressing confidential note");
        return Ok(None);
    }

    let payload = ctx.payload;
    let note = str_at(payload, "object_attributes.note")?;
    let url = opt_str(payload, "object_attributes.url").unwrap_or("");
    let mut mentions = MentionSet::new(ctx.actor());

    let lead = match parent_of(payload) {
        Parent::MergeRequest(mr) => {
            mentions.insert(assignee_of(mr, payload).as_ref());
            mentions.insert(last_commit_author(mr).as_ref());
            let iid = display_at(mr, "iid").map_err(|_| DomainError::missing("merge_request.iid"))?;
            let title = str_at(mr, "title").map_err(|_| DomainError::missing("merge_request.title"))?;
            format!("commented on MR {}", link(format!("!{iid} {title}"), url))
        }
        Parent::Commit(commit) => {
            mentions.insert(object_at(commit, "author").and_then(Actor::from_value).as_ref());
            let sha = str_at(commit, "id").map_err(|_| DomainError::missing("commit.id"))?;
            let summary = summary_line(opt_str(commit, "message").unwrap_or(""));
            format!(
                "commented on commit {}",
                link(format!("{} {summary}", truncate_sha(sha)), url)
            )
        }
        Parent::Issue(issue) => {
            let iid = display_at(issue, "iid")
                .or_else(|_| display_at(issue, "id"))
                .map_err(|_| DomainError::missing("issue.iid"))?;
            let title = str_at(issue, "title").map_err(|_| DomainError::missing("issue.title"))?;
            format!("commented on issue {}", link(format!("#{iid} {title}"), url))
        }
        Parent::Snippet(snippet) => {
            let id = display_at(snippet, "id").map_err(|_| DomainError::missing("snippet.id"))?;
            let title = opt_str(snippet, "title").unwrap_or("");
            format!("commented on code snippet {}", link(format!("${id} {title}"), url))
        }
        Parent::Other(kind) => format!("commented on {}", link(kind.to_string(), url)),
    };

    let message = ctx.project_message()?.with_text(mentions.join()).with_attachment(
        ctx.attachment(format!("{lead}\n{note}"))
            .author(ctx.actor())
            .timestamp(opt_str(payload, "object_attributes.created_at"))
            .build(ctx.received_at),
    );

    Ok(Some(message))
}

#[cfg(test)]
mod tests {
    use crate::formatters::test_support::{run, run_with};
    use crate::{EventKind, HookConfig};
    use serde_json::{json, Value};

    fn base(note: &str, noteable_type: &str) -> Value {
        json!({
            "object_kind": "note",
            "user": { "name": "Administrator", "username": "root", "avatar_url": "http://a/root.png" },
            "project": { "name": "Gitlab Test", "web_url": "http://example.com/gitlab-org/gitlab-test" },
            "object_attributes": {
                "note": note,
                "noteable_type": noteable_type,
                "url": "http://example.com/gitlab-org/gitlab-test/notes/1243"
            }
        })
    }

    #[test]
    fn test_comment_on_merge_request() {
        let mut payload = base("This MR needs work.", "MergeRequest");
        payload["merge_request"] = json!({
            "iid": 1,
            "title": "Tempora et eos debitis quae laborum et.",
            "assignee": { "name": "Jane Doe" },
            "last_commit": { "author": { "name": "Jane Doe" } }
        });

        let message = run(EventKind::Note, &payload).unwrap();
        assert_eq!(message.text, "@jane.doe");
        assert_eq!(
            message.attachments[0].text,
            "commented on MR [!1 Tempora et eos debitis quae laborum et.](http://example.com/gitlab-org/gitlab-test/notes/1243)\nThis MR needs work."
        );
    }

    #[test]
    fn test_comment_on_commit() {
        let mut payload = base("Nice fix", "Commit");
        payload["commit"] = json!({
            "id": "cfe32cf61b73a0d5e9f13e774abde7ff789b1660",
            "message": "Add submodule\n\nSigned-off-by: Dmitriy",
            "author": { "name": "Dmitriy Zaporozhets" }
        });

        let message = run(EventKind::Note, &payload).unwrap();
        assert_eq!(message.text, "@dmitriy.zaporozhets");
        assert!(message.attachments[0]
            .text
            .starts_with("commented on commit [cfe32cf6 Add submodule...]("));
    }

    #[test]
    fn test_comment_on_issue_and_snippet() {
        let mut issue = base("Hello", "Issue");
        issue["issue"] = json!({ "iid": 17, "title": "test_issue" });
        let message = run(EventKind::Note, &issue).unwrap();
        assert!(message.attachments[0].text.starts_with("commented on issue [#17 test_issue]("));
        assert_eq!(message.text, "");

        let mut snippet = base("Is this snippet doing what it's supposed to be doing?", "Snippet");
        snippet["snippet"] = json!({ "id": 53, "title": "test" });
        let message = run(EventKind::Note, &snippet).unwrap();
        assert!(message.attachments[0].text.starts_with("commented on code snippet [$53 test]("));
    }

    #[test]
    fn test_unknown_parent_is_generic() {
        let message = run(EventKind::Note, &base("Hi", "DesignManagement::Design")).unwrap();
        assert!(message.attachments[0]
            .text
            .starts_with("commented on [DesignManagement::Design]("));
    }

    #[test]
    fn test_confidential_note_suppression() {
        let mut payload = base("secret", "Issue");
        payload["issue"] = json!({ "iid": 3, "title": "hidden" });

        assert!(run(EventKind::ConfidentialNote, &payload).is_none());

        let config = HookConfig::default().with_ignore_confidential(false);
        let shown = run_with(EventKind::ConfidentialNote, &payload, &config).unwrap();
        assert!(shown.is_some());
    }
}
