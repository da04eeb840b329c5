//! Actor and Project
//!
//! Canonical records distilled from the many shapes GitLab uses for
//! "who did it" and "where did it happen". Formatters only ever see these.

use serde_json::Value;

/// Person behind an event (author, assignee, pusher...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Project the event belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub web_url: Option<String>,
    pub avatar_url: Option<String>,
}

fn text(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar_url: None,
        }
    }

    pub fn with_avatar(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Read a single user object (`{ name, username, avatar_url }`)
    pub fn from_value(value: &Value) -> Option<Self> {
        let name = text(value, "name").or_else(|| text(value, "username"))?;
        Some(Self {
            name,
            avatar_url: text(value, "avatar_url"),
        })
    }

    /// Find the triggering actor of a webhook payload
    ///
    /// Tries `user`, then the flat `user_name`/`user_avatar` fields of push
    /// events, then `author`, then `assignee`.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        if let Some(actor) = payload.get("user").and_then(Self::from_value) {
            return Some(actor);
        }

        if let Some(name) = text(payload, "user_name") {
            return Some(Self {
                name,
                avatar_url: text(payload, "user_avatar"),
            });
        }

        ["author", "assignee"]
            .iter()
            .find_map(|key| payload.get(*key).and_then(Self::from_value))
    }
}

impl Project {
    /// Find the project of a webhook payload
    ///
    /// Tries `project`, then the legacy `repository` block (whose web URL is
    /// `homepage`), then the merge request `object_attributes.target`.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        if let Some(project) = payload.get("project").and_then(Self::from_value) {
            return Some(project);
        }

        if let Some(repository) = payload.get("repository") {
            if let Some(name) = text(repository, "name") {
                return Some(Self {
                    name,
                    web_url: text(repository, "homepage").or_else(|| text(repository, "url")),
                    avatar_url: None,
                });
            }
        }

        payload
            .get("object_attributes")
            .and_then(|attrs| attrs.get("target"))
            .and_then(Self::from_value)
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            name: text(value, "name")?,
            web_url: text(value, "web_url").or_else(|| text(value, "homepage")),
            avatar_url: text(value, "avatar_url"),
        })
    }

    /// Markdown link to the project, or its bare name without a URL
    pub fn link(&self) -> String {
        match &self.web_url {
            Some(url) => format!("[{}]({})", self.name, url),
            None => self.name.clone(),
        }
    }

    /// URL below the project's web root
    pub fn url_for(&self, path: &str) -> Option<String> {
        self.web_url
            .as_deref()
            .map(|url| format!("{}/{}", url.trim_end_matches('/'), path))
    }
}
