//! Logging utilities
//!
//! Subscriber setup and helpers that keep log lines short

use crate::config::settings::LoggingConfig;
use anyhow::{Context, Result};

/// Set to true to log full prompts and model replies at debug level
/// Default is false to reduce log verbosity
pub const VERBOSE_REQUEST_LOGGING: bool = false;

/// Initialize logging system
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if config.format == "json" {
        // JSON format logs (production environment)
        Box::new(tracing_subscriber::fmt()
            .with_env_filter(config.level.clone())
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .finish())
    } else {
        // Human readable format (development environment)
        Box::new(tracing_subscriber::fmt()
            .with_env_filter(config.level.clone())
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish())
    };

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    tracing::info!("Logging system initialized");
    Ok(())
}

/// Truncate a string with a note about original length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    // Back off to a char boundary so multi-byte text never panics
    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}... ({} chars truncated)", &s[..cut], s.len() - cut)
}

/// Preview of model or prompt text for debug logs
pub fn text_preview(s: &str) -> String {
    if VERBOSE_REQUEST_LOGGING {
        s.to_string()
    } else {
        truncate_content(s, 200)
    }
}
