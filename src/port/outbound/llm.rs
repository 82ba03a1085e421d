//! LLM completion port.
//!
//! Used by the LLM-backed opportunity validator to ask whether two markets
//! describe the same event.

use async_trait::async_trait;

use crate::error::Result;

/// Client for large language model text completion.
///
/// Implementations wrap a specific provider and handle authentication and
/// response parsing. They must be `Send + Sync` so one client can be shared
/// across scan cycles.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Send a completion request and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no content.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
