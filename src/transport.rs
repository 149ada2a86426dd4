//! Chat transport — how a session reaches the chat endpoint.
//!
//! The trait keeps the session testable without a server; the HTTP
//! implementation posts the turn and adapts the chunked response body into
//! a lazy stream of decoded events via [`FrameDecoder`].

use std::pin::Pin;
use std::time::Duration;

use futures::{Stream, StreamExt};

use crate::protocol::{ChatRequest, StreamEvent};
use crate::stream::{DecodeError, FrameDecoder};

const REQUEST_TIMEOUT_SECS: u64 = 120;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// TYPES
// =============================================================================

/// Errors surfaced while sending a turn or reading its response stream.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the connection dropped mid-stream.
    #[error("chat request failed: {0}")]
    Request(String),

    /// The chat endpoint returned a non-success status.
    #[error("chat endpoint returned status {0}")]
    Status(u16),

    /// A response frame failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Lazily decoded response events for one turn.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, TransportError>> + Send>>;

/// Transport over which a conversation session runs its turns.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one turn and return its event stream.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the request is rejected before any
    /// event can be streamed.
    async fn send(&self, request: &ChatRequest) -> Result<EventStream, TransportError>;
}

// =============================================================================
// HTTP IMPLEMENTATION
// =============================================================================

/// Reqwest-backed transport against a running drafting server.
pub struct HttpChatTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpChatTransport {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_string() })
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<EventStream, TransportError> {
        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        Ok(decode_byte_stream(response.bytes_stream()))
    }
}

/// Adapt a chunked byte stream into decoded events. A trailing partial
/// frame at end of stream is dropped silently; a decode failure ends the
/// stream after surfacing the error.
fn decode_byte_stream<S>(bytes: S) -> EventStream
where
    S: Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
{
    struct DecodeState<S> {
        inner: Pin<Box<S>>,
        decoder: FrameDecoder,
        failed: bool,
    }

    let state = DecodeState { inner: Box::pin(bytes), decoder: FrameDecoder::new(), failed: false };

    Box::pin(futures::stream::unfold(state, |mut state| async move {
        if state.failed {
            return None;
        }
        loop {
            match state.decoder.next_event() {
                Ok(Some(event)) => return Some((Ok(event), state)),
                Ok(None) => {}
                Err(e) => {
                    state.failed = true;
                    return Some((Err(TransportError::Decode(e)), state));
                }
            }
            match state.inner.next().await {
                Some(Ok(chunk)) => state.decoder.extend(&chunk),
                Some(Err(e)) => {
                    state.failed = true;
                    return Some((Err(TransportError::Request(e.to_string())), state));
                }
                None => return None,
            }
        }
    }))
}
