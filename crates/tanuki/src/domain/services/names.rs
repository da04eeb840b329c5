//! Display names and mentions
//!
//! Chat accounts are expected to follow the `first.last` convention, so a
//! GitLab display name is folded into that shape before being mentioned.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::domain::entities::Actor;

/// Fold a display name into a chat account name
///
/// Diacritics are stripped, the result is lowercased and runs of whitespace
/// become single dots: `José  Dupont` → `jose.dupont`.
pub fn display_name(name: &str) -> String {
    let folded: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(".")
}

/// `@` mention for an actor
pub fn mention(actor: &Actor) -> String {
    format!("@{}", display_name(&actor.name))
}

/// Ordered set of mentions for one message
///
/// The triggering actor is never mentioned, and each account appears once.
#[derive(Debug, Clone, Default)]
pub struct MentionSet {
    trigger: Option<String>,
    mentions: Vec<String>,
}

impl MentionSet {
    pub fn new(trigger: Option<&Actor>) -> Self {
        Self {
            trigger: trigger.map(mention),
            mentions: Vec::new(),
        }
    }

    /// Add an actor; returns whether a mention was added
    pub fn insert(&mut self, actor: Option<&Actor>) -> bool {
        let Some(actor) = actor else {
            return false;
        };
        let at = mention(actor);
        if at == "@" || self.trigger.as_ref() == Some(&at) || self.mentions.contains(&at) {
            return false;
        }
        self.mentions.push(at);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.mentions
    }

    /// Space-separated mention line
    pub fn join(&self) -> String {
        self.mentions.join(" ")
    }
}
