//! Infrastructure Adapters
//!
//! Implementations of library ports for external systems.

pub mod forwarder;

// Re-exports
pub use forwarder::HttpForwarder;
