//! Domain Entities
//!
//! Request-scoped value objects; nothing here outlives a single delivery.
//! - InboundEvent: webhook delivery handed over by the transport
//! - Actor / Project: normalized "who" and "where"
//! - ChatMessage / Attachment / ErrorReport: rendered output

mod actor;
mod event;
mod message;

pub use actor::*;
pub use event::*;
pub use message::*;
