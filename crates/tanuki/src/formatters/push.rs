//! Push Hook

use serde_json::Value;

use super::fields::{array_at, is_null, opt_str, opt_u64, str_at};
use super::HookContext;
use crate::domain::entities::{Attachment, ChatMessage};
use crate::domain::errors::DomainError;
use crate::domain::services::{
    first_line, human_timestamp, is_zero_sha, parse_ref, pluralize, truncate_sha,
};

/// Shape of a push, decided before anything is rendered
#[derive(Debug, PartialEq, Eq)]
enum PushKind {
    BranchDeleted,
    BranchCreated,
    Commits,
}

fn classify(payload: &Value) -> Result<PushKind, DomainError> {
    let commits = array_at(payload, "commits")?;
    if is_null(payload, "checkout_sha") && commits.is_empty() {
        return Ok(PushKind::BranchDeleted);
    }
    if is_zero_sha(str_at(payload, "before")?) {
        return Ok(PushKind::BranchCreated);
    }
    Ok(PushKind::Commits)
}

pub fn format_push(ctx: &HookContext<'_>) -> Result<Option<ChatMessage>, DomainError> {
    let payload = ctx.payload;
    let project = ctx.project()?;
    let branch = parse_ref(str_at(payload, "ref")?);
    let commit_count = opt_u64(payload, "total_commits_count")
        .unwrap_or(array_at(payload, "commits")?.len() as u64);
    let branch_link = match project.url_for(&format!("commits/{branch}")) {
        Some(url) => format!("[{branch}]({url})"),
        None => branch.to_string(),
    };

    let message = ctx.project_message()?;

    let message = match classify(payload)? {
        PushKind::BranchDeleted => message.with_attachment(
            ctx.attachment(format!("removed branch {branch} from {}", project.link()))
                .author(ctx.actor())
                .build(ctx.received_at),
        ),
        PushKind::BranchCreated => message.with_attachment(
            ctx.attachment(format!(
                "pushed new branch {branch_link} to {}, with {}",
                project.link(),
                pluralize(commit_count, "commit")
            ))
            .author(ctx.actor())
            .build(ctx.received_at),
        ),
        PushKind::Commits => {
            let commits = array_at(payload, "commits")?;
            let lines = commits
                .iter()
                .enumerate()
                .map(|(i, commit)| commit_line(commit, i))
                .collect::<Result<Vec<_>, _>>()?;

            let mut summary = format!(
                "pushed {} to branch {branch_link} in {}",
                pluralize(commit_count, "commit"),
                project.link()
            );
            if (commits.len() as u64) < commit_count {
                summary.push_str(&format!(" (showing {} of {commit_count})", commits.len()));
            }

            let last_ts = commits.last().and_then(|c| opt_str(c, "timestamp"));
            message
                .with_attachment(
                    ctx.attachment(summary)
                        .author(ctx.actor())
                        .timestamp(last_ts)
                        .build(ctx.received_at),
                )
                .with_attachment(Attachment::plain(
                    lines.join("\n"),
                    ctx.config.notification_color.clone(),
                ))
        }
    };

    Ok(Some(message))
}

/// `  - <time> [<sha8>](<url>) by <author>: <first line>`
fn commit_line(commit: &Value, index: usize) -> Result<String, DomainError> {
    let field = |name: &str| format!("commits.{index}.{name}");
    let sha = str_at(commit, "id").map_err(|_| DomainError::missing(field("id")))?;
    let author = str_at(commit, "author.name").map_err(|_| DomainError::missing(field("author.name")))?;
    let message = opt_str(commit, "message").unwrap_or("");
    let when = opt_str(commit, "timestamp")
        .map(human_timestamp)
        .unwrap_or_default();
    let short = truncate_sha(sha);
    let sha_link = match opt_str(commit, "url") {
        Some(url) => format!("[{short}]({url})"),
        None => short.to_string(),
    };

    Ok(format!(
        "  - {when} {sha_link} by {author}: {}",
        first_line(message)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatters::test_support::{run, run_with};
    use crate::{EventKind, HookConfig};
    use serde_json::json;

    const ZERO: &str = "0000000000000000000000000000000000000000";

    fn push_payload() -> Value {
        json!({
            "object_kind": "push",
            "before": "95790bf891e76fee5e1747ab589903a6a1f80f22",
            "after": "da1560886d4f094c3e6c9ef40349f7d38b5d27d7",
            "ref": "refs/heads/master",
            "checkout_sha": "da1560886d4f094c3e6c9ef40349f7d38b5d27d7",
            "user_name": "John Smith",
            "user_username": "jsmith",
            "user_avatar": "http://a/john.png",
            "project": {
                "name": "Diaspora",
                "web_url": "http://example.com/mike/diaspora",
                "avatar_url": null
            },
            "commits": [
                {
                    "id": "b6568db1bc1dcd7f8b4d5a946b0b91f9dacd7327",
                    "message": "Update Catalan translation to e38cb41.\n\nMore details",
                    "timestamp": "2011-12-12T14:27:31+02:00",
                    "url": "http://example.com/mike/diaspora/commit/b6568db1",
                    "author": { "name": "Jordi Mallach", "email": "jordi@softcatala.org" }
                },
                {
                    "id": "da1560886d4f094c3e6c9ef40349f7d38b5d27d7",
                    "message": "fixed readme",
                    "timestamp": "2012-01-03T23:36:29+02:00",
                    "url": "http://example.com/mike/diaspora/commit/da156088",
                    "author": { "name": "GitLab dev user", "email": "gitlabdev@dv6700.(none)" }
                }
            ],
            "total_commits_count": 2
        })
    }

    #[test]
    fn test_ordinary_push_lists_commits() {
        let message = run(EventKind::Push, &push_payload()).unwrap();

        assert_eq!(message.username, "gitlab/Diaspora");
        assert_eq!(message.icon_url.as_deref(), Some("http://a/john.png"));
        assert_eq!(message.attachments.len(), 2);
        assert_eq!(
            message.attachments[0].text,
            "pushed 2 commits to branch [master](http://example.com/mike/diaspora/commits/master) in [Diaspora](http://example.com/mike/diaspora)"
        );
        assert_eq!(message.attachments[0].author_name.as_deref(), Some("john.smith"));

        let lines: Vec<&str> = message.attachments[1].text.lines().collect();
        assert_eq!(
            lines[0],
            "  - Mon, 12 Dec 2011 12:27:31 GMT [b6568db1](http://example.com/mike/diaspora/commit/b6568db1) by Jordi Mallach: Update Catalan translation to e38cb41."
        );
        assert!(lines[1].contains("[da156088]"));
        assert!(lines[1].ends_with("by GitLab dev user: fixed readme"));
    }

    #[test]
    fn test_branch_deletion_skips_commits() {
        let mut payload = push_payload();
        payload["checkout_sha"] = Value::Null;
        payload["after"] = json!(ZERO);
        payload["commits"] = json!([]);
        payload["total_commits_count"] = json!(0);

        assert_eq!(classify(&payload).unwrap(), PushKind::BranchDeleted);
        let message = run(EventKind::Push, &payload).unwrap();
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(
            message.attachments[0].text,
            "removed branch master from [Diaspora](http://example.com/mike/diaspora)"
        );
    }

    #[test]
    fn test_deletion_wins_even_with_zero_before() {
        let mut payload = push_payload();
        payload["checkout_sha"] = Value::Null;
        payload["before"] = json!(ZERO);
        payload["commits"] = json!([]);
        assert_eq!(classify(&payload).unwrap(), PushKind::BranchDeleted);
    }

    #[test]
    fn test_new_branch_regardless_of_commit_count() {
        for count in [0, 1, 5] {
            let mut payload = push_payload();
            payload["before"] = json!(ZERO);
            payload["ref"] = json!("refs/heads/feature");
            payload["total_commits_count"] = json!(count);

            assert_eq!(classify(&payload).unwrap(), PushKind::BranchCreated);
            let message = run(EventKind::Push, &payload).unwrap();
            assert_eq!(message.attachments.len(), 1);
            assert!(message.attachments[0].text.starts_with(
                "pushed new branch [feature](http://example.com/mike/diaspora/commits/feature)"
            ));
        }
    }

    #[test]
    fn test_truncated_commit_list_is_noted() {
        let mut payload = push_payload();
        payload["total_commits_count"] = json!(40);
        let message = run(EventKind::Push, &payload).unwrap();
        assert!(message.attachments[0].text.ends_with("(showing 2 of 40)"));
    }

    #[test]
    fn test_missing_total_falls_back_to_commit_list() {
        let mut payload = push_payload();
        payload.as_object_mut().unwrap().remove("total_commits_count");
        let message = run(EventKind::Push, &payload).unwrap();
        assert!(message.attachments[0].text.starts_with("pushed 2 commits to branch"));
        assert!(!message.attachments[0].text.contains("showing"));
    }

    #[test]
    fn test_commit_without_author_is_malformed() {
        let mut payload = push_payload();
        payload["commits"][1]["author"] = Value::Null;
        let err = run_with(EventKind::Push, &payload, &HookConfig::default()).unwrap_err();
        assert!(matches!(err, DomainError::MissingField { field } if field == "commits.1.author.name"));
    }
}
