use std::collections::VecDeque;
use std::sync::Mutex;

use super::*;
use crate::fields::FlatFields;
use crate::preview::PreviewHandle;
use crate::protocol::Role;
use crate::transport::{EventStream, TransportError};

type ScriptItem = Result<Vec<Result<StreamEvent, TransportError>>, TransportError>;

/// Transport replaying scripted event streams and recording requests.
struct ScriptedTransport {
    script: Mutex<VecDeque<ScriptItem>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    fn new(script: Vec<ScriptItem>) -> Self {
        Self { script: Mutex::new(script.into()), requests: Mutex::new(Vec::new()) }
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(&self, request: &ChatRequest) -> Result<EventStream, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let item = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![Ok(StreamEvent::Done)]));
        item.map(|events| Box::pin(futures::stream::iter(events)) as EventStream)
    }
}

fn text(delta: &str) -> Result<StreamEvent, TransportError> {
    Ok(StreamEvent::Text { delta: delta.to_string() })
}

fn fields_event(pairs: &[(&str, &str)]) -> Result<StreamEvent, TransportError> {
    let data: FlatFields = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    Ok(StreamEvent::Fields { data })
}

fn doc_type_event(doc_type: &str) -> Result<StreamEvent, TransportError> {
    Ok(StreamEvent::DocType { data: doc_type.to_string() })
}

fn done() -> Result<StreamEvent, TransportError> {
    Ok(StreamEvent::Done)
}

// =========================================================================
// first turn
// =========================================================================

#[tokio::test]
async fn start_synthesizes_known_doc_opening() {
    let transport = ScriptedTransport::new(vec![Ok(vec![text("Hi! What's the purpose?"), done()])]);
    let mut session = ConversationSession::new("mnda");

    assert_eq!(session.start(&transport).await, TurnOutcome::Completed);

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "Hello, I need help drafting a legal document.");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "Hi! What's the purpose?");
}

#[tokio::test]
async fn start_with_unknown_doc_uses_classifier_opening() {
    let transport = ScriptedTransport::new(vec![Ok(vec![done()])]);
    let mut session = ConversationSession::new(docs::UNKNOWN);
    session.start(&transport).await;

    assert_eq!(
        session.messages()[0].content,
        "Hello, I need help figuring out which legal document I need."
    );
}

#[tokio::test]
async fn start_twice_is_ignored() {
    let transport = ScriptedTransport::new(vec![Ok(vec![done()]), Ok(vec![done()])]);
    let mut session = ConversationSession::new("mnda");

    assert_eq!(session.start(&transport).await, TurnOutcome::Completed);
    assert_eq!(session.start(&transport).await, TurnOutcome::Ignored);
    assert_eq!(transport.requests().len(), 1);
}

// =========================================================================
// streaming application
// =========================================================================

#[tokio::test]
async fn text_deltas_grow_the_open_message_monotonically() {
    let transport =
        ScriptedTransport::new(vec![Ok(vec![text("Hello "), text("there "), text("friend."), done()])]);
    let mut session = ConversationSession::new("mnda");
    session.start(&transport).await;

    assert_eq!(session.messages().last().unwrap().content, "Hello there friend.");
    assert_eq!(session.phase(), TurnPhase::Idle);
}

#[tokio::test]
async fn fields_events_merge_into_store_in_arrival_order() {
    let transport = ScriptedTransport::new(vec![Ok(vec![
        fields_event(&[("party1Name", "Alice")]),
        fields_event(&[("party1Title", "CEO"), ("purpose", "Evaluation")]),
        done(),
    ])]);
    let mut session = ConversationSession::new("mnda");
    session.start(&transport).await;

    let party = session.fields().party("party1").expect("party1");
    assert_eq!(party.name, "Alice");
    assert_eq!(party.title, "CEO");
    assert_eq!(session.fields().get("purpose"), Some("Evaluation"));
}

#[tokio::test]
async fn doc_type_switch_resets_fields_then_merges_new_ones() {
    let transport = ScriptedTransport::new(vec![
        Ok(vec![fields_event(&[("purpose", "old-type value")]), done()]),
        Ok(vec![
            text("Sounds like a CSA."),
            doc_type_event("csa"),
            fields_event(&[("providerName", "Acme Corp")]),
            done(),
        ]),
    ]);
    let mut session = ConversationSession::new(docs::UNKNOWN);
    session.start(&transport).await;
    assert_eq!(session.send("I need a SaaS contract", &transport).await, TurnOutcome::Completed);

    assert_eq!(session.doc_type(), "csa");
    assert_eq!(session.fields().get("providerName"), Some("Acme Corp"));
    assert_eq!(session.fields().get("purpose"), None, "old type's fields are cleared");
}

#[tokio::test]
async fn fields_arriving_before_doc_type_switch_are_dropped() {
    let transport = ScriptedTransport::new(vec![Ok(vec![
        fields_event(&[("purpose", "merged then discarded")]),
        doc_type_event("pilot"),
        done(),
    ])]);
    let mut session = ConversationSession::new(docs::UNKNOWN);
    session.start(&transport).await;

    assert_eq!(session.doc_type(), "pilot");
    assert!(session.fields().is_empty());
}

#[tokio::test]
async fn redundant_doc_type_event_keeps_fields() {
    let transport = ScriptedTransport::new(vec![Ok(vec![
        fields_event(&[("purpose", "Evaluation")]),
        doc_type_event("mnda"),
        done(),
    ])]);
    let mut session = ConversationSession::new("mnda");
    session.start(&transport).await;

    assert_eq!(session.doc_type(), "mnda");
    assert_eq!(session.fields().get("purpose"), Some("Evaluation"));
}

#[tokio::test]
async fn unknown_events_are_skipped() {
    let transport = ScriptedTransport::new(vec![Ok(vec![
        text("Hi"),
        Ok(StreamEvent::Unknown),
        text("!"),
        done(),
    ])]);
    let mut session = ConversationSession::new("mnda");
    session.start(&transport).await;
    assert_eq!(session.messages().last().unwrap().content, "Hi!");
}

// =========================================================================
// request shape
// =========================================================================

#[tokio::test]
async fn request_snapshots_history_fields_and_doc_type() {
    let transport = ScriptedTransport::new(vec![
        Ok(vec![text("Reply one"), fields_event(&[("purpose", "Evaluation")]), done()]),
        Ok(vec![text("Reply two"), done()]),
    ]);
    let mut session = ConversationSession::new("mnda");
    session.start(&transport).await;
    session.send("The purpose is evaluation", &transport).await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);

    let second = &requests[1];
    assert_eq!(second.doc_type.as_deref(), Some("mnda"));
    assert_eq!(second.fields.get("purpose").map(String::as_str), Some("Evaluation"));
    // History: first user turn, its full reply, and the new user message.
    // The empty placeholder for the in-flight turn is never sent.
    assert_eq!(second.messages.len(), 3);
    assert_eq!(second.messages[1].content, "Reply one");
    assert_eq!(second.messages[2].content, "The purpose is evaluation");
    assert!(second.messages.iter().all(|m| !m.content.is_empty()));
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let transport = ScriptedTransport::new(vec![Ok(vec![done()])]);
    let mut session = ConversationSession::new("mnda");
    session.start(&transport).await;
    let before = session.messages().len();

    assert_eq!(session.send("   ", &transport).await, TurnOutcome::Ignored);
    assert_eq!(session.messages().len(), before);
    assert_eq!(transport.requests().len(), 1);
}

// =========================================================================
// failures
// =========================================================================

#[tokio::test]
async fn request_rejection_substitutes_failure_notice() {
    let transport = ScriptedTransport::new(vec![Err(TransportError::Status(502))]);
    let mut session = ConversationSession::new("mnda");

    assert_eq!(session.start(&transport).await, TurnOutcome::Failed);
    assert_eq!(session.phase(), TurnPhase::Idle);

    let last = session.messages().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.content, FAILURE_NOTICE);
}

#[tokio::test]
async fn mid_stream_decode_failure_keeps_already_merged_fields() {
    let transport = ScriptedTransport::new(vec![Ok(vec![
        text("Partial "),
        fields_event(&[("governingLaw", "Delaware")]),
        Err(TransportError::Decode(crate::stream::DecodeError::MalformedFrame("bad".to_string()))),
    ])]);
    let mut session = ConversationSession::new("mnda");

    assert_eq!(session.start(&transport).await, TurnOutcome::Failed);
    assert_eq!(session.messages().last().unwrap().content, FAILURE_NOTICE);
    assert_eq!(session.fields().get("governingLaw"), Some("Delaware"), "failures are not transactional");
    assert!(!session.is_busy());
}

#[tokio::test]
async fn failed_session_accepts_the_next_turn() {
    let transport = ScriptedTransport::new(vec![
        Err(TransportError::Status(500)),
        Ok(vec![text("Recovered"), done()]),
    ]);
    let mut session = ConversationSession::new("mnda");
    session.start(&transport).await;

    assert_eq!(session.send("try again", &transport).await, TurnOutcome::Completed);
    assert_eq!(session.messages().last().unwrap().content, "Recovered");
}

// =========================================================================
// preview notifications
// =========================================================================

#[tokio::test]
async fn field_merges_and_switches_notify_the_preview() {
    let (handle, mut rx) = PreviewHandle::capturing();
    let transport = ScriptedTransport::new(vec![Ok(vec![
        fields_event(&[("purpose", "Evaluation")]),
        doc_type_event("pilot"),
        fields_event(&[("providerName", "Acme")]),
        done(),
    ])]);
    let mut session = ConversationSession::new(docs::UNKNOWN).with_preview(handle);
    session.start(&transport).await;

    let first = rx.try_recv().expect("merge notification");
    assert_eq!(first.doc_type, docs::UNKNOWN);
    assert_eq!(first.fields.get("purpose").map(String::as_str), Some("Evaluation"));

    let second = rx.try_recv().expect("switch notification");
    assert_eq!(second.doc_type, "pilot");
    assert!(second.fields.is_empty());

    let third = rx.try_recv().expect("post-switch merge notification");
    assert_eq!(third.doc_type, "pilot");
    assert_eq!(third.fields.get("providerName").map(String::as_str), Some("Acme"));

    assert!(rx.try_recv().is_err(), "no extra notifications");
}
