//! Shared application state.
//!
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! The LLM client is optional: the preview endpoint works without one, and
//! the chat endpoint reports the assistant as unavailable.

use std::sync::Arc;

use crate::llm::LlmChat;

/// Shared application state. Clone is required by Axum; the inner client is
/// Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>) -> Self {
        Self { llm }
    }
}
