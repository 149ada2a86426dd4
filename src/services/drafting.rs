//! Drafting service — one conversation turn against the LLM.
//!
//! DESIGN
//! ======
//! The assistant answers every turn with a structured payload:
//! `{ reply, fields }`. The service assembles the per-document system
//! prompt (reminding the model which fields are already collected), calls
//! the provider with the document's response schema, and parses the reply
//! leniently: models occasionally wrap JSON in code fences, and extracted
//! field values may be null for fields the turn did not touch.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::docs::{self, DocConfig};
use crate::fields::FlatFields;
use crate::llm::LlmChat;
use crate::llm::types::LlmError;
use crate::protocol::ChatMessage;

const MAX_TOKENS: u32 = 4096;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("assistant reply parse failed: {0}")]
    ReplyParse(String),
}

/// Outcome of one turn: the assistant's conversational reply, the fields it
/// extracted, and the detected document type in the classifier flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    pub reply: String,
    pub fields: FlatFields,
    pub detected_doc_type: Option<String>,
}

// =============================================================================
// TURN EXECUTION
// =============================================================================

/// Run one conversation turn and return the parsed structured reply.
///
/// # Errors
///
/// Returns a [`DraftError`] when the provider call fails or its reply
/// cannot be parsed into the structured shape.
pub async fn run_turn(
    llm: &Arc<dyn LlmChat>,
    doc_type: &str,
    messages: &[ChatMessage],
    current_fields: &FlatFields,
) -> Result<TurnReply, DraftError> {
    let config = docs::config_or_unknown(doc_type);
    let system = build_system_prompt(config, current_fields);
    let schema = docs::response_schema(config);

    info!(doc_type = config.key, turns = messages.len(), "drafting: turn start");
    let raw = llm
        .chat(MAX_TOKENS, &system, messages, Some(&schema))
        .await?;

    let mut reply = parse_reply(&raw)?;
    let detected_doc_type = if docs::is_undetermined(config.key) {
        reply.fields.remove(docs::DETECTED_DOC_TYPE_FIELD)
    } else {
        // The classifier pseudo-field is meaningless outside the unknown flow.
        reply.fields.remove(docs::DETECTED_DOC_TYPE_FIELD);
        None
    };

    info!(
        doc_type = config.key,
        extracted = reply.fields.len(),
        detected = detected_doc_type.as_deref().unwrap_or(""),
        "drafting: turn complete"
    );

    Ok(TurnReply { reply: reply.reply, fields: reply.fields, detected_doc_type })
}

/// System prompt: the document's base prompt plus the already-collected
/// fields, so the model does not re-ask for them.
pub(crate) fn build_system_prompt(config: &DocConfig, current_fields: &FlatFields) -> String {
    let filled: Vec<String> = current_fields
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{k}: {v}"))
        .collect();

    if filled.is_empty() {
        config.prompt.to_string()
    } else {
        format!("{}\n\nFields already collected:\n{}", config.prompt, filled.join("\n"))
    }
}

// =============================================================================
// REPLY PARSING
// =============================================================================

struct ParsedReply {
    reply: String,
    fields: FlatFields,
}

fn parse_reply(raw: &str) -> Result<ParsedReply, DraftError> {
    let payload = extract_json_object(raw)
        .ok_or_else(|| DraftError::ReplyParse("no JSON object in reply".to_string()))?;
    let root: Value =
        serde_json::from_str(payload).map_err(|e| DraftError::ReplyParse(e.to_string()))?;

    let reply = root
        .get("reply")
        .and_then(Value::as_str)
        .ok_or_else(|| DraftError::ReplyParse("missing reply text".to_string()))?
        .to_string();

    let mut fields = FlatFields::new();
    if let Some(map) = root.get("fields").and_then(Value::as_object) {
        for (key, value) in map {
            match value {
                Value::String(s) if !s.is_empty() => {
                    fields.insert(key.clone(), s.clone());
                }
                Value::Null | Value::String(_) => {}
                other => {
                    warn!(field = %key, value = %other, "drafting: non-string field value dropped");
                }
            }
        }
    }

    Ok(ParsedReply { reply, fields })
}

/// The outermost `{ ... }` span of the text, tolerating code fences and
/// prose around the object.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

#[cfg(test)]
#[path = "drafting_test.rs"]
mod tests;
