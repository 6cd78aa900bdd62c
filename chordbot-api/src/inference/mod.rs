//! Fallback inference
//!
//! When the chord table has no exact match, the normalized notes are sent to
//! a hosted generative model as a natural-language prompt. The completion is
//! passed back untouched; nothing here checks that it names a real chord.

use async_trait::async_trait;
use thiserror::Error;

pub mod hosted;

pub use hosted::HostedInferenceClient;

/// Token budget requested for each completion
pub const MAX_NEW_TOKENS: u32 = 20;

/// Inference client errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// Network communication error (connect, send, read)
    #[error("Network error: {0}")]
    Network(String),

    /// Service answered with a non-success status
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Response decoded but carried no generated text
    #[error("Empty completion")]
    EmptyCompletion,
}

/// Text-completion capability used by the chord resolver
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Ask the model to name the chord formed by `notes`
    ///
    /// Single attempt, no retry, no caching.
    async fn complete(&self, notes: &[String]) -> Result<String, InferenceError>;
}

/// Prompt sent to the model for a list of note names
pub fn build_prompt(notes: &[String]) -> String {
    format!(
        "Identify the musical chord made of notes: {}",
        notes.join(", ")
    )
}
