//! Conversation session — the per-turn orchestrator.
//!
//! DESIGN
//! ======
//! One session owns the transcript, the active document type and the field
//! store, and runs at most one turn at a time: Idle -> Sending (request
//! posted, placeholder assistant message appended) -> Streaming (decoded
//! events applied one by one) -> Idle. The send surface is a no-op while a
//! turn is in flight.
//!
//! Event application rules:
//! - `text` deltas grow the single open assistant message, never truncate it;
//! - `fields` merge into the store in arrival order;
//! - `doc_type` switches the active document and resets the store. The
//!   backend guarantees `doc_type` precedes `fields` within a turn; if
//!   fields merged earlier in the same turn get discarded by the switch,
//!   that is logged rather than silently reordered.
//!
//! Failures are not transactional: a transport or decode error replaces the
//! placeholder with a fixed notice and returns to Idle, but merges applied
//! before the failure stand.

use futures::StreamExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::docs;
use crate::fields::{self, FieldSet};
use crate::preview::PreviewHandle;
use crate::protocol::{ChatMessage, ChatRequest, StreamEvent};
use crate::transport::ChatTransport;

/// Fixed notice shown in place of the assistant reply when a turn fails.
pub const FAILURE_NOTICE: &str = "Sorry, something went wrong. Please try again.";

/// Synthetic content of the system-issued first turn.
#[must_use]
pub fn start_message(doc_type: &str) -> &'static str {
    if docs::is_undetermined(doc_type) {
        "Hello, I need help figuring out which legal document I need."
    } else {
        "Hello, I need help drafting a legal document."
    }
}

/// Greeting shown before the conversation starts.
#[must_use]
pub fn welcome_text(doc_type: &str) -> &'static str {
    if docs::is_undetermined(doc_type) {
        "Tell me what kind of legal agreement you need and I'll identify the right document for you."
    } else {
        "Chat with our AI to draft your document. The preview will fill in automatically as we gather the details."
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// Where the session is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Sending,
    Streaming,
}

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The stream completed cleanly.
    Completed,
    /// Transport or decode failure; the failure notice was substituted.
    Failed,
    /// Nothing happened: a turn was already in flight, or the input was
    /// blank, or the session was already started.
    Ignored,
}

/// Client-side conversation state for one document session.
pub struct ConversationSession {
    id: Uuid,
    doc_type: String,
    fields: FieldSet,
    messages: Vec<ChatMessage>,
    phase: TurnPhase,
    started: bool,
    preview: Option<PreviewHandle>,
}

impl ConversationSession {
    #[must_use]
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            doc_type: doc_type.into(),
            fields: FieldSet::default(),
            messages: Vec::new(),
            phase: TurnPhase::Idle,
            started: false,
            preview: None,
        }
    }

    /// Attach a preview handle notified on every field-store mutation.
    #[must_use]
    pub fn with_preview(mut self, preview: PreviewHandle) -> Self {
        self.preview = Some(preview);
        self
    }

    #[must_use]
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    #[must_use]
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// True while a turn is in flight; submissions are no-ops then.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase != TurnPhase::Idle
    }

    #[must_use]
    pub fn started(&self) -> bool {
        self.started
    }

    // =========================================================================
    // TURNS
    // =========================================================================

    /// Run the synthetic first turn. A no-op once the session has started.
    pub async fn start(&mut self, transport: &dyn ChatTransport) -> TurnOutcome {
        if self.started || self.is_busy() {
            return TurnOutcome::Ignored;
        }
        self.started = true;
        let opening = start_message(&self.doc_type).to_string();
        self.run_turn(&opening, transport).await
    }

    /// Submit one user message. A no-op while a turn is in flight or for
    /// blank input.
    pub async fn send(&mut self, text: &str, transport: &dyn ChatTransport) -> TurnOutcome {
        let text = text.trim();
        if text.is_empty() || self.is_busy() {
            return TurnOutcome::Ignored;
        }
        self.run_turn(text, transport).await
    }

    async fn run_turn(&mut self, user_text: &str, transport: &dyn ChatTransport) -> TurnOutcome {
        self.messages.push(ChatMessage::user(user_text));
        let request = ChatRequest {
            messages: self.messages.clone(),
            fields: self.fields.to_flat(),
            doc_type: Some(self.doc_type.clone()),
        };

        // The one open assistant message for this turn.
        self.messages.push(ChatMessage::assistant(""));
        self.phase = TurnPhase::Sending;
        info!(session = %self.id, doc_type = %self.doc_type, "turn: sending");

        let mut stream = match transport.send(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(session = %self.id, error = %e, "turn: request failed");
                return self.fail_turn();
            }
        };

        self.phase = TurnPhase::Streaming;
        let mut fields_merged_this_turn = false;

        while let Some(event) = stream.next().await {
            match event {
                Ok(StreamEvent::Text { delta }) => self.append_delta(&delta),
                Ok(StreamEvent::Fields { data }) => {
                    self.fields = fields::merge(&self.fields, &data);
                    fields_merged_this_turn = true;
                    self.notify_preview();
                }
                Ok(StreamEvent::DocType { data }) => {
                    self.switch_doc_type(data, fields_merged_this_turn);
                }
                Ok(StreamEvent::Done | StreamEvent::Unknown) => {}
                Err(e) => {
                    warn!(session = %self.id, error = %e, "turn: stream failed");
                    return self.fail_turn();
                }
            }
        }

        self.phase = TurnPhase::Idle;
        info!(session = %self.id, turns = self.messages.len() / 2, "turn: complete");
        TurnOutcome::Completed
    }

    // =========================================================================
    // EVENT APPLICATION
    // =========================================================================

    fn append_delta(&mut self, delta: &str) {
        if let Some(open) = self.messages.last_mut() {
            open.content.push_str(delta);
        }
    }

    fn switch_doc_type(&mut self, detected: String, fields_merged_this_turn: bool) {
        if detected == self.doc_type {
            debug!(session = %self.id, doc_type = %detected, "turn: redundant doc_type event");
            return;
        }
        if fields_merged_this_turn && !self.fields.is_empty() {
            warn!(
                session = %self.id,
                from = %self.doc_type,
                to = %detected,
                "turn: fields merged before doc_type switch are discarded"
            );
        }
        info!(session = %self.id, from = %self.doc_type, to = %detected, "turn: document type switch");
        self.doc_type = detected;
        self.fields = FieldSet::default();
        self.notify_preview();
    }

    fn fail_turn(&mut self) -> TurnOutcome {
        if let Some(open) = self.messages.last_mut() {
            open.content = FAILURE_NOTICE.to_string();
        }
        self.phase = TurnPhase::Idle;
        TurnOutcome::Failed
    }

    fn notify_preview(&self) {
        if let Some(preview) = &self.preview {
            preview.update(&self.doc_type, &self.fields);
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
