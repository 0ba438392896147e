//! Question generation request/response models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /generate`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub topic: Option<String>,
}

impl GenerateRequest {
    /// The topic, when present and non-empty
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref().filter(|topic| !topic.is_empty())
    }
}

/// Success envelope
///
/// `data` is whatever JSON the model produced; its question shape is not checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub data: Value,
}

impl GenerateResponse {
    pub fn new(data: Value) -> Self {
        Self { success: true, data }
    }
}
