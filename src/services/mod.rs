//! Service layer module
//!
//! Contains the prompt template, the model-output parser and the Gemini client

pub mod gemini;
pub mod parser;
pub mod prompt;

use crate::utils::error::AppResult;
use async_trait::async_trait;
use serde_json::Value;

pub use gemini::GeminiClient;
pub use parser::parse_model_json;
pub use prompt::build_prompt;

/// Produces a question set for a topic
///
/// Implementations make at most one upstream call per invocation and
/// return the parsed model output without checking its shape.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, topic: &str) -> AppResult<Value>;
}
