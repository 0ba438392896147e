//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod generate;
pub mod health;

use crate::config::Settings;
use crate::middleware::request_logging_middleware;
use crate::services::{GeminiClient, QuestionGenerator};
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit, http::HeaderValue, middleware, routing::get, routing::post, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state
///
/// Built once before the listener starts and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub generator: Arc<dyn QuestionGenerator>,
}

/// Create application router backed by the Gemini client
pub async fn create_router(settings: Settings) -> Result<Router> {
    let client = GeminiClient::new(&settings)?;
    info!("🤖 Using model: {}", client.model());

    create_router_with_generator(settings, Arc::new(client))
}

/// Create application router with a caller-supplied generator
pub fn create_router_with_generator(
    settings: Settings,
    generator: Arc<dyn QuestionGenerator>,
) -> Result<Router> {
    let cors = build_cors_layer(&settings)?;
    let max_request_size = settings.request.max_request_size;

    let app_state = Arc::new(AppState { settings, generator });

    // Uptime counts from router creation
    health::get_uptime_seconds();

    // Create middleware stack
    // Body limit replaces axum's 2 MB default; oversized bodies surface as
    // extractor rejections
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(DefaultBodyLimit::max(max_request_size));

    let router = Router::new()
        .route("/", get(health::root))
        .route("/generate", post(generate::handle_generate))
        .route("/health", get(health::health_check))
        .with_state(app_state)
        .layer(middleware_stack);

    Ok(match cors {
        Some(cors) => router.layer(cors),
        None => router,
    })
}

/// CORS layer from the security settings, `None` when disabled
fn build_cors_layer(settings: &Settings) -> Result<Option<CorsLayer>> {
    if !settings.security.cors_enabled {
        return Ok(None);
    }

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if settings.allows_any_origin() {
        return Ok(Some(layer.allow_origin(Any)));
    }

    let origins = settings
        .security
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("🔒 CORS restricted to: {}", settings.security.allowed_origins.join(", "));
    Ok(Some(layer.allow_origin(origins)))
}
