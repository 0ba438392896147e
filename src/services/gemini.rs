//! Gemini generation client
//!
//! Sends one `generateContent` call per topic and turns the reply into JSON

use super::parser::parse_model_json;
use super::prompt::build_prompt;
use super::QuestionGenerator;
use crate::config::Settings;
use crate::models::gemini::{GeminiRequest, GeminiResponse};
use crate::utils::error::{helpers, AppResult};
use crate::utils::logging::text_preview;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    question_count: u32,
}

impl GeminiClient {
    /// Create a new client instance
    pub fn new(settings: &Settings) -> Result<Self> {
        // No timeout override: the client default applies
        let client = Client::builder()
            .user_agent(concat!("mcqgen/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.gemini.base_url.trim_end_matches('/').to_string(),
            model: settings.gemini.model.clone(),
            api_key: settings.gemini.api_key.clone(),
            question_count: settings.generation.question_count,
        })
    }

    /// Model identifier this client calls
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request URL (without the key, which goes in the query)
    fn build_url(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    /// Send one generateContent call and return the first candidate's text
    pub async fn generate_text(&self, prompt: String) -> AppResult<String> {
        let url = self.build_url();
        debug!("Sending Gemini generateContent request to {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&GeminiRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("Gemini request failed: {}", e);
                e
            })?;

        let status = response.status();
        let body = response.text().await?;

        // The reply is inspected regardless of status: errors arrive as a JSON `error` object
        let reply: GeminiResponse = match serde_json::from_str(&body) {
            Ok(reply) => reply,
            Err(e) => {
                error!("Gemini returned an unreadable body: {} - {}", status, text_preview(&body));
                return Err(helpers::upstream_error(format!(
                    "Upstream request failed: {} - {}",
                    status, e
                )));
            }
        };

        if let Some(err) = &reply.error {
            let message = err
                .message
                .clone()
                .unwrap_or_else(|| format!("Upstream request failed: {}", status));
            error!("Gemini API error ({:?}): {}", err.status, message);
            return Err(helpers::upstream_error(message));
        }

        match reply.first_text() {
            Some(text) => {
                debug!("📤 Model text: {}", text_preview(text));
                Ok(text.to_string())
            }
            None => {
                warn!("Gemini returned no content (finish reason: {:?})", reply.finish_reason());
                Err(helpers::no_content())
            }
        }
    }
}

#[async_trait]
impl QuestionGenerator for GeminiClient {
    async fn generate(&self, topic: &str) -> AppResult<Value> {
        info!("Generating {} questions for topic: {}", self.question_count, topic);

        let prompt = build_prompt(topic, self.question_count);
        debug!("📥 Prompt: {}", text_preview(&prompt));

        let text = self.generate_text(prompt).await?;
        let parsed = parse_model_json(&text)?;

        info!("Questions generated for topic: {}", topic);
        Ok(parsed)
    }
}
