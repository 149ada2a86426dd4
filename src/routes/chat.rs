//! `POST /api/chat` — one conversation turn, streamed as event frames.
//!
//! DESIGN
//! ======
//! The LLM call itself is not streamed: the provider returns one structured
//! payload, and this handler replays it as an event stream so clients get
//! word-granular text deltas followed by the extracted fields. Frame order
//! is part of the contract: `text*`, then `doc_type` (when detected, always
//! before fields so consumers merge into the right schema), then `fields`,
//! then `done`.

use std::convert::Infallible;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::response::sse::{Event, Sse};
use futures::Stream;
use tracing::warn;

use crate::protocol::{ChatRequest, StreamEvent};
use crate::services::drafting::{self, TurnReply};
use crate::state::AppState;

/// One conversation turn. Returns 503 when no LLM is configured and 502
/// when the provider call or reply parse fails.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let Some(llm) = state.llm.as_ref() else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let doc_type = request.doc_type.as_deref().unwrap_or(crate::docs::UNKNOWN);
    let reply = drafting::run_turn(llm, doc_type, &request.messages, &request.fields)
        .await
        .map_err(|e| {
            warn!(error = %e, "chat: turn failed");
            StatusCode::BAD_GATEWAY
        })?;

    let events = turn_events(reply);
    let stream = futures::stream::iter(
        events
            .into_iter()
            .map(|event| {
                Event::default()
                    .json_data(&event)
                    .unwrap_or_else(|_| Event::default().data("{}"))
            })
            .map(Ok),
    );
    Ok(Sse::new(stream))
}

/// Expand one structured turn reply into the wire event sequence.
pub(crate) fn turn_events(reply: TurnReply) -> Vec<StreamEvent> {
    let mut events: Vec<StreamEvent> = split_deltas(&reply.reply)
        .into_iter()
        .map(|delta| StreamEvent::Text { delta })
        .collect();

    if let Some(detected) = reply.detected_doc_type {
        events.push(StreamEvent::DocType { data: detected });
    }
    events.push(StreamEvent::Fields { data: reply.fields });
    events.push(StreamEvent::Done);
    events
}

/// Word-granular deltas: every word keeps its trailing space except the
/// last, so concatenating the deltas reproduces the reply exactly.
pub(crate) fn split_deltas(reply: &str) -> Vec<String> {
    let words: Vec<&str> = reply.split(' ').collect();
    let last = words.len().saturating_sub(1);
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i == last {
                (*word).to_string()
            } else {
                format!("{word} ")
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
