//! Cover-page template rendering: field substitution + markdown to HTML.
//!
//! Placeholders are `{{fieldName}}`. Filled fields substitute verbatim;
//! unknown or empty fields render as an italicized `[fieldName]` marker so
//! the preview shows what is still missing.

use pulldown_cmark::{Options, Parser, html};

use crate::fields::FlatFields;

/// Substitute fields into a markdown cover page and return HTML.
#[must_use]
pub fn render_cover(source: &str, fields: &FlatFields) -> String {
    let substituted = substitute(source, fields);
    let parser = Parser::new_ext(&substituted, Options::ENABLE_TABLES);
    let mut out = String::with_capacity(substituted.len() * 2);
    html::push_html(&mut out, parser);
    out
}

/// Fixed notice for document types without a registered template.
#[must_use]
pub fn missing_template_html(doc_type: &str) -> String {
    format!("<p><em>Template not available for document type: {doc_type}</em></p>")
}

/// Replace every `{{key}}` occurrence. Keys are ASCII word characters; a
/// `{{` without a well-formed key passes through untouched.
fn substitute(source: &str, fields: &FlatFields) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) if is_field_key(&after[..end]) => {
                let key = &after[..end];
                match fields.get(key).filter(|v| !v.is_empty()) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("<em>[");
                        out.push_str(key);
                        out.push_str("]</em>");
                    }
                }
                rest = &after[end + 2..];
            }
            _ => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_field_key(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
