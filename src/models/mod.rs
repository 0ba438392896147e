//! Data models module
//!
//! Defines the inbound generation envelopes and the Gemini wire format

pub mod gemini;
pub mod generation;

pub use generation::{GenerateRequest, GenerateResponse};
