use anyhow::{Context, Result};
use axum::{middleware, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod auth;
mod models;
mod routes;
mod settings;

use adapters::HttpForwarder;
use models::HealthCheck;
use settings::Settings;
use tanuki::{ChatSink, Dispatcher};

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub forwarder: Option<Arc<dyn ChatSink>>,
    pub gitlab_token: Option<String>,
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is running", body = HealthCheck)
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Tanuki is listening for GitLab hooks".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the router with shared state
pub fn app(state: AppState) -> Router {
    // Hook routes (require the GitLab token when configured)
    let hook_routes = routes::hook::router().layer(middleware::from_fn_with_state(
        state.clone(),
        auth::token_middleware,
    ));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(hook_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tanuki=info,tanuki_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🦝 Tanuki initializing...");

    let settings = Settings::from_env().context("Failed to load settings")?;

    if settings.gitlab_token.is_some() {
        tracing::info!("🔐 GitLab token check enabled");
    } else {
        tracing::warn!("⚠️  No TANUKI_GITLAB_TOKEN set - token check disabled");
    }

    let forwarder: Option<Arc<dyn ChatSink>> = match &settings.forward_url {
        Some(url) => {
            let forwarder = HttpForwarder::new(url.clone(), settings.forward_timeout)
                .context("Failed to initialize forwarder")?;
            tracing::info!("📨 Forwarding messages to {}", forwarder.url());
            Some(Arc::new(forwarder))
        }
        None => {
            tracing::warn!("⚠️  No TANUKI_FORWARD_URL set - messages are only returned");
            None
        }
    };

    let state = AppState {
        dispatcher: Arc::new(Dispatcher::new(settings.hook.clone())),
        forwarder,
        gitlab_token: settings.gitlab_token.clone(),
    };

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Tanuki ready on {}", settings.bind_addr);

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}
