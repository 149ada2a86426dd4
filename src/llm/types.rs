//! LLM types — provider-neutral trait and errors.
//!
//! Both providers reduce to one operation: system prompt + transcript in,
//! assistant text out. Structured output is requested with a JSON schema;
//! how the schema is enforced is provider-specific (native response format
//! on OpenAI, schema instructions on Anthropic), so the trait only promises
//! best-effort conformance and callers parse defensively.

use serde_json::Value;

use crate::protocol::ChatMessage;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl LlmError {
    /// True for failures worth retrying (transport faults, rate limits,
    /// provider 5xx).
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// LLM CHAT TRAIT
// =============================================================================

/// Provider-neutral async trait for LLM chat. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Send a chat request and return the assistant's text.
    ///
    /// When `schema` is given, the provider is asked to shape the reply as
    /// a single JSON object matching it.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the response is
    /// malformed, or the API key is absent.
    async fn chat(
        &self,
        max_tokens: u32,
        system: &str,
        messages: &[ChatMessage],
        schema: Option<&Value>,
    ) -> Result<String, LlmError>;
}
