//! `POST /api/preview` — render document markup for the current fields.

use axum::extract::State;
use axum::response::Json;

use crate::fields::FieldSet;
use crate::protocol::{PreviewRequest, PreviewResponse};
use crate::render;
use crate::state::AppState;

/// Render the preview HTML. Unregistered document types get the fixed
/// missing-template notice rather than an error.
pub async fn preview(
    State(_state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Json<PreviewResponse> {
    let fields = FieldSet::from_flat(&request.fields);
    let html = render::render_html(&request.doc_type, &fields);
    Json(PreviewResponse { html })
}
