//! Tanuki API Routes
//!
//! - /hooks/gitlab - GitLab webhook receiver
//! - /swagger-ui - OpenAPI documentation

pub mod hook;
pub mod swagger;
