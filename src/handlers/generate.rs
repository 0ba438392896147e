//! Question generation handler

use crate::handlers::AppState;
use crate::models::{GenerateRequest, GenerateResponse};
use crate::utils::error::{helpers, AppError, AppResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Handle question generation requests
///
/// POST /generate
///
/// A missing, empty or unreadable topic is rejected before the generator is called;
/// a body over the configured limit gets a 413.
pub async fn handle_generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> AppResult<Json<GenerateResponse>> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("Generate request body over limit: {}", rejection.body_text());
            return Err(AppError::PayloadTooLarge);
        }
        Err(rejection) => {
            warn!("Unreadable generate request body: {}", rejection.body_text());
            return Err(helpers::topic_required());
        }
    };

    let topic = request.topic().ok_or_else(helpers::topic_required)?;
    debug!("Received generate request for topic: {}", topic);

    let data = state.generator.generate(topic).await?;

    Ok(Json(GenerateResponse::new(data)))
}
