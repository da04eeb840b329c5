//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod event_kind;

pub use event_kind::*;
