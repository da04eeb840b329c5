//! Tanuki Server Data Models
//!
//! - Health: liveness probe
//! - Hook: query parameters of the GitLab webhook endpoint

mod health;
mod hook;

pub use health::*;
pub use hook::*;
