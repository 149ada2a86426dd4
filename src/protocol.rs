//! Wire protocol — the contract between the drafting server and clients.
//!
//! ARCHITECTURE
//! ============
//! Every chat turn is one HTTP POST answered by a stream of event frames,
//! each `"data: " + JSON + "\n\n"`. The payloads here are shared by the
//! server routes (encoding) and the client decoder (parsing), so the two
//! sides cannot drift.

use serde::{Deserialize, Serialize};

use crate::fields::FlatFields;

/// Marker prefixing every event frame on the wire.
pub const EVENT_PREFIX: &str = "data: ";

/// Blank-line delimiter terminating every event frame.
pub const EVENT_DELIMITER: &str = "\n\n";

// =============================================================================
// MESSAGES
// =============================================================================

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

// =============================================================================
// REQUEST / RESPONSE BODIES
// =============================================================================

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub fields: FlatFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
}

/// Body of `POST /api/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub doc_type: String,
    #[serde(default)]
    pub fields: FlatFields,
}

/// Response of `POST /api/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub html: String,
}

// =============================================================================
// STREAM EVENTS
// =============================================================================

/// One typed event decoded from (or encoded into) a response frame.
///
/// `doc_type` is emitted before `fields` within a turn; fields following a
/// switch belong to the new document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A chunk of assistant reply text, appended to the open message.
    Text { delta: String },
    /// A partial field extraction to merge into the field store.
    Fields { data: FlatFields },
    /// The backend identified (or re-identified) the document type.
    DocType { data: String },
    /// Terminal marker; the stream ends after this frame.
    Done,
    /// Any unrecognized event type — skipped by consumers.
    #[serde(other)]
    Unknown,
}
