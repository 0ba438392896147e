//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default Gemini models endpoint
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Placeholder some deployments ship in their `.env` template
pub const API_KEY_PLACEHOLDER: &str = "YOUR_GEMINI_API_KEY_HERE";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Gemini API configuration
    pub gemini: GeminiConfig,
    /// Question generation configuration
    pub generation: GenerationConfig,
    /// Request configuration
    pub request: RequestConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key, empty when not configured
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Models base URL, e.g. `.../v1beta/models`
    pub base_url: String,
    /// Model identifier
    pub model: String,
}

/// Question generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Number of questions requested per topic
    pub question_count: u32,
}

/// Request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Maximum request size in bytes
    pub max_request_size: usize,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed origins for CORS
    pub allowed_origins: Vec<String>,
    /// Whether CORS is enabled
    pub cors_enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance from the process environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let settings = Self {
            server: ServerConfig {
                host: get("SERVER_HOST", "0.0.0.0"),
                port: get("PORT", "3000")
                    .parse()
                    .context("Invalid port number")?,
            },
            gemini: GeminiConfig {
                api_key: get("GL_API_KEY", ""),
                base_url: get("GEMINI_API_BASE", DEFAULT_API_BASE),
                model: get("MODEL", DEFAULT_MODEL),
            },
            generation: GenerationConfig {
                question_count: get("QUESTION_COUNT", "2")
                    .parse()
                    .context("Invalid question count")?,
            },
            request: RequestConfig {
                max_request_size: get("MAX_REQUEST_SIZE", "1048576")
                    .parse()
                    .context("Invalid maximum request size")?,
            },
            security: SecurityConfig {
                allowed_origins: allowed_origins(&lookup),
                cors_enabled: get("CORS_ENABLED", "true")
                    .parse()
                    .context("Invalid CORS enabled flag")?,
            },
            logging: LoggingConfig {
                level: get("RUST_LOG", "info"),
                format: get("LOG_FORMAT", "text"),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        if !self.gemini.base_url.starts_with("http") {
            anyhow::bail!("Invalid Gemini base URL format, should start with 'http'");
        }

        if self.gemini.model.trim().is_empty() {
            anyhow::bail!("Model identifier cannot be empty");
        }

        if !(1..=50).contains(&self.generation.question_count) {
            anyhow::bail!(
                "Question count must be between 1 and 50, got {}",
                self.generation.question_count
            );
        }

        if self.request.max_request_size == 0 {
            anyhow::bail!("Maximum request size cannot be 0");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }

    /// Whether a real Gemini credential is configured
    pub fn has_api_key(&self) -> bool {
        let key = self.gemini.api_key.trim();
        !key.is_empty() && key != API_KEY_PLACEHOLDER
    }

    /// Whether CORS accepts any origin
    pub fn allows_any_origin(&self) -> bool {
        self.security.allowed_origins.iter().any(|o| o == "*")
    }

    /// Listen address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Production deployments only accept their own front end;
/// otherwise the ALLOWED_ORIGINS list applies
fn allowed_origins<F>(lookup: &F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let production = lookup("NODE_ENV").is_some_and(|env| env == "production");
    if production {
        if let Some(app_url) = lookup("APP_URL").filter(|u| !u.trim().is_empty()) {
            return vec![app_url.trim().to_string()];
        }
    }

    lookup("ALLOWED_ORIGINS")
        .unwrap_or_else(|| "*".to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
