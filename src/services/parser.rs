//! Lenient JSON extraction from model output
//!
//! Models asked for "JSON only" still wrap it in prose or code fences now
//! and then. The text is parsed as-is first; if that fails, the span from
//! the first `{` to the last `}` is tried.

use crate::utils::error::FormatError;
use serde_json::Value;
use tracing::debug;

/// Parse model text as JSON, falling back to the outermost brace span
///
/// The value is returned as parsed; its shape is not checked.
pub fn parse_model_json(text: &str) -> Result<Value, FormatError> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(strict_err) => {
            debug!("Strict JSON parse failed ({}), trying brace extraction", strict_err);

            let span = extract_brace_span(text).ok_or(FormatError)?;
            serde_json::from_str::<Value>(span).map_err(|err| {
                debug!("Extracted span is not JSON either: {}", err);
                FormatError
            })
        }
    }
}

/// Slice from the first `{` through the last `}`, inclusive
fn extract_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    // Both delimiters are ASCII, so the byte indices are char boundaries
    (start <= end).then(|| &text[start..=end])
}
