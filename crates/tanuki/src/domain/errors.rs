//! Domain Errors
//!
//! Error types raised while turning a GitLab payload into a chat message.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Missing field: {field}")]
    MissingField { field: String },

    #[error("Invalid field: {field} (expected {expected})")]
    InvalidField { field: String, expected: String },

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn missing<T: AsRef<str>>(field: T) -> Self {
        Self::MissingField {
            field: field.as_ref().to_string(),
        }
    }

    pub fn invalid<T: AsRef<str>>(field: T, expected: &str) -> Self {
        Self::InvalidField {
            field: field.as_ref().to_string(),
            expected: expected.to_string(),
        }
    }

    /// Whether the error was caused by the shape of the inbound payload
    pub fn is_malformed_payload(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::InvalidField { .. })
    }
}
