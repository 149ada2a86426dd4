//! Preview pump — debounced, latest-wins document preview fetching.
//!
//! DESIGN
//! ======
//! Field merges arrive at keystroke-to-turn granularity; rendering on every
//! one would thrash the preview endpoint. A background task coalesces
//! updates within a fixed quiet window and dispatches one request for the
//! latest state. Every dispatch gets a monotonically increasing sequence
//! number and only the response matching the latest issued sequence is
//! applied, so a slow superseded fetch can never overwrite a fresher one.
//!
//! The MNDA is rendered in-process through the document renderer; other
//! types go through the preview endpoint. The undetermined document type
//! suppresses rendering entirely.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::docs;
use crate::fields::{FieldSet, FlatFields};
use crate::protocol::{PreviewRequest, PreviewResponse};
use crate::render;

/// Quiet window for coalescing preview-triggering updates.
pub const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(300);

/// Fixed fallback markup shown when a preview fetch fails.
pub const PREVIEW_FALLBACK_HTML: &str = "<p><em>Preview unavailable. Please try again.</em></p>";

/// Structured placeholder shown before the first successful render.
pub const PREVIEW_LOADING_HTML: &str =
    "<div class=\"doc-skeleton\"><div></div><div></div><div></div><div></div></div>";

// =============================================================================
// TYPES
// =============================================================================

/// What the preview surface should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    /// No successful render yet (or a fetch is in flight).
    Loading,
    /// Markup of the most recent successful render.
    Ready(String),
    /// The last fetch failed; show the fixed fallback.
    Unavailable,
}

impl PreviewState {
    /// Markup for the display surface.
    #[must_use]
    pub fn markup(&self) -> &str {
        match self {
            Self::Loading => PREVIEW_LOADING_HTML,
            Self::Ready(html) => html,
            Self::Unavailable => PREVIEW_FALLBACK_HTML,
        }
    }
}

/// Errors from the preview rendering endpoint.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("preview request failed: {0}")]
    Request(String),
    #[error("preview endpoint returned status {0}")]
    Status(u16),
}

/// Source of rendered markup for one `(doc_type, fields)` state.
#[async_trait::async_trait]
pub trait RenderPreview: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`PreviewError`] when the rendering service is unreachable
    /// or rejects the request.
    async fn render(&self, doc_type: &str, fields: &FlatFields) -> Result<String, PreviewError>;
}

#[derive(Debug, Clone)]
pub(crate) struct PreviewInput {
    pub(crate) doc_type: String,
    pub(crate) fields: FlatFields,
}

// =============================================================================
// HANDLE & PUMP
// =============================================================================

/// Cheap cloneable sender feeding the pump. Updates after the pump is gone
/// are silently ignored.
#[derive(Clone)]
pub struct PreviewHandle {
    tx: mpsc::UnboundedSender<PreviewInput>,
}

impl PreviewHandle {
    /// Record a new `(doc_type, fields)` state.
    pub fn update(&self, doc_type: &str, fields: &FieldSet) {
        let input = PreviewInput { doc_type: doc_type.to_string(), fields: fields.to_flat() };
        let _ = self.tx.send(input);
    }

    /// Handle wired to a bare receiver instead of a pump task.
    #[cfg(test)]
    pub(crate) fn capturing() -> (Self, mpsc::UnboundedReceiver<PreviewInput>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

/// The debouncing preview fetcher.
pub struct PreviewPump {
    handle: PreviewHandle,
    state_rx: watch::Receiver<PreviewState>,
    _task: JoinHandle<()>,
}

impl PreviewPump {
    /// Spawn the pump task. It runs until every [`PreviewHandle`] is
    /// dropped.
    #[must_use]
    pub fn spawn(fetcher: Arc<dyn RenderPreview>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PreviewState::Loading);
        let task = tokio::spawn(run(rx, fetcher, state_tx));
        Self { handle: PreviewHandle { tx }, state_rx, _task: task }
    }

    #[must_use]
    pub fn handle(&self) -> PreviewHandle {
        self.handle.clone()
    }

    /// Watch the display state. The receiver outlives the pump safely.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<PreviewState> {
        self.state_rx.clone()
    }
}

// =============================================================================
// PUMP LOOP
// =============================================================================

async fn run(
    mut rx: mpsc::UnboundedReceiver<PreviewInput>,
    fetcher: Arc<dyn RenderPreview>,
    state_tx: watch::Sender<PreviewState>,
) {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(u64, Result<String, PreviewError>)>();
    let mut pending: Option<PreviewInput> = None;
    let mut deadline: Option<Instant> = None;
    let mut latest_seq: u64 = 0;

    loop {
        let timer_at = deadline;
        let timer = async move {
            match timer_at {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            update = rx.recv() => match update {
                Some(input) => {
                    if docs::is_undetermined(&input.doc_type) {
                        // Suppress rendering: cancel the pending dispatch and
                        // invalidate any fetch already in flight.
                        pending = None;
                        deadline = None;
                        latest_seq += 1;
                        let _ = state_tx.send(PreviewState::Loading);
                    } else {
                        pending = Some(input);
                        deadline = Some(Instant::now() + PREVIEW_DEBOUNCE);
                    }
                }
                None => break,
            },
            () = timer => {
                deadline = None;
                let Some(input) = pending.take() else { continue };
                latest_seq += 1;
                let _ = state_tx.send(PreviewState::Loading);

                if docs::is_client_rendered(&input.doc_type) {
                    let fields = FieldSet::from_flat(&input.fields);
                    apply(&state_tx, Ok(render::render_html(&input.doc_type, &fields)));
                } else {
                    let seq = latest_seq;
                    let fetcher = Arc::clone(&fetcher);
                    let done_tx = done_tx.clone();
                    tokio::spawn(async move {
                        let result = fetcher.render(&input.doc_type, &input.fields).await;
                        let _ = done_tx.send((seq, result));
                    });
                }
            }
            Some((seq, result)) = done_rx.recv() => {
                if seq == latest_seq {
                    apply(&state_tx, result);
                } else {
                    debug!(seq, latest_seq, "preview: superseded response dropped");
                }
            }
        }
    }
}

fn apply(state_tx: &watch::Sender<PreviewState>, result: Result<String, PreviewError>) {
    let next = match result {
        Ok(html) => PreviewState::Ready(html),
        Err(e) => {
            warn!(error = %e, "preview: fetch failed");
            PreviewState::Unavailable
        }
    };
    let _ = state_tx.send(next);
}

// =============================================================================
// HTTP FETCHER
// =============================================================================

/// Reqwest-backed fetcher against the preview endpoint.
pub struct HttpPreviewClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPreviewClient {
    /// # Errors
    ///
    /// Returns a [`PreviewError`] when the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, PreviewError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PreviewError::Request(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_string() })
    }
}

#[async_trait::async_trait]
impl RenderPreview for HttpPreviewClient {
    async fn render(&self, doc_type: &str, fields: &FlatFields) -> Result<String, PreviewError> {
        let request = PreviewRequest { doc_type: doc_type.to_string(), fields: fields.clone() };
        let response = self
            .http
            .post(format!("{}/api/preview", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| PreviewError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PreviewError::Status(status.as_u16()));
        }

        let body: PreviewResponse = response
            .json()
            .await
            .map_err(|e| PreviewError::Request(e.to_string()))?;
        Ok(body.html)
    }
}

#[cfg(test)]
#[path = "preview_test.rs"]
mod tests;
