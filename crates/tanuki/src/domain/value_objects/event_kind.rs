//! EventKind - GitLab webhook discriminator

use crate::domain::errors::DomainError;

/// Kind of GitLab webhook event, as announced by the `X-Gitlab-Event` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Push,
    TagPush,
    MergeRequest,
    Note,
    ConfidentialNote,
    Issue,
    ConfidentialIssue,
    Pipeline,
    Build,
    WikiPage,
    System,
}

impl EventKind {
    /// Every recognized kind, in dispatch order
    pub const ALL: [EventKind; 11] = [
        EventKind::Push,
        EventKind::TagPush,
        EventKind::MergeRequest,
        EventKind::Note,
        EventKind::ConfidentialNote,
        EventKind::Issue,
        EventKind::ConfidentialIssue,
        EventKind::Pipeline,
        EventKind::Build,
        EventKind::WikiPage,
        EventKind::System,
    ];

    /// Canonical header value sent by GitLab
    pub fn header(&self) -> &'static str {
        match self {
            EventKind::Push => "Push Hook",
            EventKind::TagPush => "Tag Push Hook",
            EventKind::MergeRequest => "Merge Request Hook",
            EventKind::Note => "Note Hook",
            EventKind::ConfidentialNote => "Confidential Note Hook",
            EventKind::Issue => "Issue Hook",
            EventKind::ConfidentialIssue => "Confidential Issue Hook",
            EventKind::Pipeline => "Pipeline Hook",
            EventKind::Build => "Build Hook",
            EventKind::WikiPage => "Wiki Page Hook",
            EventKind::System => "System Hook",
        }
    }

    pub fn is_confidential(&self) -> bool {
        matches!(self, EventKind::ConfidentialNote | EventKind::ConfidentialIssue)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

impl std::str::FromStr for EventKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Push Hook" => Ok(EventKind::Push),
            "Tag Push Hook" => Ok(EventKind::TagPush),
            "Merge Request Hook" => Ok(EventKind::MergeRequest),
            "Note Hook" => Ok(EventKind::Note),
            "Confidential Note Hook" => Ok(EventKind::ConfidentialNote),
            "Issue Hook" => Ok(EventKind::Issue),
            "Confidential Issue Hook" => Ok(EventKind::ConfidentialIssue),
            "Pipeline Hook" => Ok(EventKind::Pipeline),
            // GitLab renamed builds to jobs; both headers are still delivered
            "Build Hook" | "Job Hook" => Ok(EventKind::Build),
            "Wiki Page Hook" => Ok(EventKind::WikiPage),
            "System Hook" => Ok(EventKind::System),
            other => Err(DomainError::UnknownEvent(other.to_string())),
        }
    }
}
