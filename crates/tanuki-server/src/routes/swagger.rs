//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use tanuki::{Attachment, ChatMessage, ErrorReport};

use crate::models::HealthCheck;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::health_check,
        super::hook::receive_hook,
    ),
    info(
        title = "Tanuki API",
        version = "0.3.0",
        description = "GitLab webhook events rendered as chat-platform messages.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Hooks", description = "GitLab webhook receiver"),
    ),
    components(
        schemas(
            HealthCheck,
            ChatMessage,
            Attachment,
            ErrorReport,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_hook_route() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/hooks/gitlab"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
