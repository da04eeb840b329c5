//! Chat Delivery Port
//!
//! Abstract interface for posting a rendered message to a chat platform's
//! incoming-webhook endpoint.

use async_trait::async_trait;

use crate::domain::entities::ChatMessage;
use crate::domain::errors::DomainError;

/// Chat message delivery interface
///
/// Implementations perform a single attempt; redelivery is not supported.
///
/// # Example
///
/// ```rust,ignore
/// use tanuki::ports::ChatSink;
///
/// struct HttpForwarder { /* reqwest client */ }
///
/// #[async_trait]
/// impl ChatSink for HttpForwarder {
///     async fn post(&self, message: &ChatMessage) -> Result<(), DomainError> {
///         // POST the message JSON to the incoming-webhook URL
///     }
///
///     fn name(&self) -> &str {
///         "http"
///     }
/// }
/// ```
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Post one message
    ///
    /// Fails with `DomainError::ExternalService` when the platform is
    /// unreachable or rejects the message.
    async fn post(&self, message: &ChatMessage) -> Result<(), DomainError>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records every posted message
    #[derive(Default)]
    struct RecordingSink {
        posted: Mutex<Vec<ChatMessage>>,
    }

    #[async_trait]
    impl ChatSink for RecordingSink {
        async fn post(&self, message: &ChatMessage) -> Result<(), DomainError> {
            self.posted
                .lock()
                .map_err(|e| DomainError::Internal(e.to_string()))?
                .push(message.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn test_sink_is_object_safe() {
        let sink: Box<dyn ChatSink> = Box::new(RecordingSink::default());
        sink.post(&ChatMessage::new("gitlab/demo")).await.unwrap();
        assert_eq!(sink.name(), "recording");
    }
}
