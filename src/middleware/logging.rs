//! Logging middleware
//!
//! Records HTTP request and response information

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::{Duration, Instant};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Requests slower than this are flagged
const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(5);

/// Request logging middleware
///
/// Wraps each request in an `http_request` span with a fresh request id
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
    );

    async move {
        info!(
            "Request started: {} {} - User-Agent: {}",
            method,
            uri,
            request
                .headers()
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
        );

        let response = next.run(request).await;

        let duration = start_time.elapsed();
        let status = response.status();
        let elapsed_ms = duration.as_secs_f64() * 1000.0;

        if status.is_success() {
            info!("Request completed: {} - Duration: {:.2}ms", status, elapsed_ms);
        } else if status.is_client_error() {
            warn!("Client error: {} - Duration: {:.2}ms", status, elapsed_ms);
        } else if status.is_server_error() {
            warn!("Server error: {} - Duration: {:.2}ms", status, elapsed_ms);
        } else {
            info!("Request response: {} - Duration: {:.2}ms", status, elapsed_ms);
        }

        // Model calls routinely take a few seconds; anything past the threshold is worth a look
        if duration > SLOW_REQUEST_THRESHOLD {
            warn!(
                "Slow request detected: {} {} - Duration: {:.2}s",
                method,
                uri,
                duration.as_secs_f64()
            );
        }

        response
    }
    .instrument(span)
    .await
}
