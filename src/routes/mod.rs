//! Router assembly.
//!
//! Three endpoints: health, the streaming chat turn, and the preview
//! renderer. CORS stays open (the document UI is served from a different
//! origin in development) and every request is traced.

pub mod chat;
pub mod preview;

use axum::Router;
use axum::response::Json;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/chat", post(chat::chat))
        .route("/api/preview", post(preview::preview))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
