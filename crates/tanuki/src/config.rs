//! Hook configuration
//!
//! One immutable instance per process, handed to the [`Dispatcher`](crate::Dispatcher)
//! at construction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::errors::DomainError;

/// Default side-bar color of notifications
pub const NOTIF_COLOR: &str = "#6498CC";
/// Default side-bar color of error notices
pub const ERROR_COLOR: &str = "#d22852";

/// Rendering policy for GitLab events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Whether tag pushes may notify everyone with `@all`
    pub mention_all_allowed: bool,
    /// Drop confidential issues and notes instead of posting them
    pub ignore_confidential_issues: bool,
    /// Drop unrecognized events instead of echoing their payload
    pub ignore_unknown_events: bool,
    /// Return a bare error object instead of a diagnostic chat message
    pub ignore_error_messages: bool,
    /// Never set `icon_url`, letting the chat platform pick the avatar
    pub use_platform_default_avatar: bool,
    /// Avatar used when neither the project nor the actor has one
    pub default_avatar_url: Option<String>,
    /// Length of the attachment title taken from its text; `0` disables titles
    pub attachment_title_length: usize,
    pub notification_color: String,
    pub error_color: String,
    /// Pipeline/job status to color
    pub status_colors: BTreeMap<String, String>,
    /// Action keyword to past-tense verb (wiki pages, system events)
    pub action_verbs: BTreeMap<String, String>,
}

fn default_status_colors() -> BTreeMap<String, String> {
    [
        ("success", "#2faa60"),
        ("pending", "#e75e40"),
        ("failed", "#d22852"),
        ("canceled", "#5c5c5c"),
        ("created", "#ffc107"),
        ("running", "#607c8b"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_action_verbs() -> BTreeMap<String, String> {
    [
        ("create", "created"),
        ("destroy", "removed"),
        ("delete", "removed"),
        ("update", "updated"),
        ("rename", "renamed"),
        ("transfer", "transferred"),
        ("add", "added"),
        ("remove", "removed"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            mention_all_allowed: false,
            ignore_confidential_issues: true,
            ignore_unknown_events: false,
            ignore_error_messages: false,
            use_platform_default_avatar: false,
            default_avatar_url: None,
            attachment_title_length: 0,
            notification_color: NOTIF_COLOR.to_string(),
            error_color: ERROR_COLOR.to_string(),
            status_colors: default_status_colors(),
            action_verbs: default_action_verbs(),
        }
    }
}

impl HookConfig {
    pub fn with_mention_all(mut self, allowed: bool) -> Self {
        self.mention_all_allowed = allowed;
        self
    }

    pub fn with_ignore_confidential(mut self, ignore: bool) -> Self {
        self.ignore_confidential_issues = ignore;
        self
    }

    pub fn with_ignore_unknown(mut self, ignore: bool) -> Self {
        self.ignore_unknown_events = ignore;
        self
    }

    pub fn with_ignore_errors(mut self, ignore: bool) -> Self {
        self.ignore_error_messages = ignore;
        self
    }

    pub fn with_platform_avatar(mut self, enable: bool) -> Self {
        self.use_platform_default_avatar = enable;
        self
    }

    pub fn with_default_avatar(mut self, url: impl Into<String>) -> Self {
        self.default_avatar_url = Some(url.into());
        self
    }

    pub fn with_title_length(mut self, length: usize) -> Self {
        self.attachment_title_length = length;
        self
    }

    /// Color for a pipeline or job status, falling back to the notification color
    pub fn status_color(&self, status: Option<&str>) -> &str {
        status
            .and_then(|s| self.status_colors.get(s))
            .unwrap_or(&self.notification_color)
    }

    /// Past-tense verb for an action keyword
    pub fn action_verb(&self, action: &str) -> Option<&str> {
        self.action_verbs.get(action).map(String::as_str)
    }

    /// Check that every color is a `#rgb` or `#rrggbb` hex value
    pub fn validate(&self) -> Result<(), DomainError> {
        let colors = [
            ("notification_color", &self.notification_color),
            ("error_color", &self.error_color),
        ]
        .into_iter()
        .chain(
            self.status_colors
                .iter()
                .map(|(status, color)| (status.as_str(), color)),
        );

        for (key, color) in colors {
            if !is_hex_color(color) {
                return Err(DomainError::Config(format!(
                    "{key}: '{color}' is not a hex color"
                )));
            }
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
