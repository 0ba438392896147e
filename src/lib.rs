//! MCQ Generator Library
//!
//! Turns a topic into NEET-PG style multiple-choice questions via the Gemini API

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use handlers::{create_router, create_router_with_generator, AppState};
pub use services::{parse_model_json, GeminiClient, QuestionGenerator};
pub use utils::error::{AppError, AppResult, FormatError};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
