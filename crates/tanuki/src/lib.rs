//! Tanuki Domain Library
//!
//! Renders GitLab webhook events as chat-platform messages.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): entities, value objects, helpers and errors
//! - **Formatters** (`formatters/`): one pure function per event kind
//! - **Dispatcher** (`dispatcher`): discriminator lookup, failure capture, channel override
//! - **Ports** (`ports/`): delivery interface implemented by the binaries
//!
//! The library performs no I/O and never installs a tracing subscriber.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tanuki::{Dispatcher, HookConfig, InboundEvent};
//!
//! let dispatcher = Dispatcher::new(HookConfig::default());
//! let event = InboundEvent::new("Push Hook", payload).with_channel(Some("ops".into()));
//! let body = dispatcher.route(&event).into_json();
//! ```

pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod formatters;
pub mod ports;

// Re-export commonly used types
pub use config::HookConfig;
pub use dispatcher::{Dispatcher, Outcome};
pub use domain::{
    Actor, Attachment, ChatMessage, DomainError, ErrorReport, EventKind, InboundEvent, Project,
};
pub use ports::ChatSink;
