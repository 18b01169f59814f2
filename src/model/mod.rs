//! Generative model boundary.
//!
//! The dialogue engine and the scoring handoff only see the
//! `CompletionModel` trait; the production implementation is the Gemini
//! REST client. Model failure is always recoverable for the caller.

mod gemini;
pub mod prompt;

pub use gemini::GeminiModel;

use anyhow::Result;
use async_trait::async_trait;

/// Prompt in, completion out. Implementations must be safe to share
/// across the per-session tasks.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
