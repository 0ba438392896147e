//! Health check handlers
//!
//! Provides application health status check endpoints

use crate::handlers::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Fixed liveness text served on `/`
pub const ROOT_MESSAGE: &str = "🧠 MD NEET-PG Question Generator Backend is running!";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version information
    pub version: String,
    /// Timestamp
    pub timestamp: String,
    /// Details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

/// Check result
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDetails {
    /// Configured Gemini model
    pub model: String,
    /// Whether an API key is configured (the key itself is never reported)
    pub api_key_configured: bool,
    /// Questions requested per topic
    pub question_count: u32,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Root liveness check
///
/// GET /
pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// Basic health check
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing health check");

    let response = HealthResponse {
        status: "healthy".to_string(),
        service: crate::NAME.to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        details: Some(HealthDetails {
            model: state.settings.gemini.model.clone(),
            api_key_configured: state.settings.has_api_key(),
            question_count: state.settings.generation.question_count,
            uptime_seconds: get_uptime_seconds(),
        }),
    };

    Json(response)
}

/// Get service uptime in seconds
pub fn get_uptime_seconds() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START_TIME: OnceLock<Instant> = OnceLock::new();

    START_TIME.get_or_init(Instant::now).elapsed().as_secs()
}
