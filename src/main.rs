//! MCQ Generator Server
//!
//! HTTP backend that generates NEET-PG / AIIMS / USMLE-level MCQs with Google Gemini.
//! Questions are not stored; the model's JSON goes straight back to the caller.

use anyhow::{Context, Result};
use mcqgen::utils::logging::init_logging;
use mcqgen::{create_router, version_info, Settings};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load settings from environment (.env is read first if present)
    let settings = Settings::new().context("Failed to load server settings")?;

    init_logging(&settings.logging)?;
    info!("{}", version_info());

    if !settings.has_api_key() {
        warn!("⚠️ GL_API_KEY not set. Set it in your .env file.");
    }

    let addr = settings.bind_address();

    // Create router
    let app = create_router(settings).await?;

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("✅ Backend running at: http://{}", addr);
    info!("🧩 Generate endpoint: http://{}/generate", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, starting graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
