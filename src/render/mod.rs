//! Document renderers — pure functions from fields to display markup.
//!
//! The contract is one entry point, [`render_html`]: the MNDA renders
//! through its dedicated renderer, every other registered type through its
//! cover-page template, and anything else gets the missing-template notice.

pub mod mnda;
pub mod template;

use crate::docs;
use crate::fields::FieldSet;

/// Render the display markup for a document type and its current fields.
#[must_use]
pub fn render_html(doc_type: &str, fields: &FieldSet) -> String {
    if docs::is_client_rendered(doc_type) {
        return mnda::render(&mnda::MndaData::from_fields(fields));
    }
    match docs::config(doc_type).and_then(|c| c.cover_template) {
        Some(source) => template::render_cover(source, &fields.to_flat()),
        None => template::missing_template_html(doc_type),
    }
}
