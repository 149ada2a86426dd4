//! Mutual NDA renderer — the one fully client-rendered document.
//!
//! DESIGN
//! ======
//! A pure mapping from the nested field shape to document HTML: cover
//! sections, signature blocks, then a fixed list of eleven numbered
//! standard-terms clauses. Only embedded spans vary with field values; the
//! clause count never does. Missing scalars render bracketed placeholders,
//! missing party members a fixed blank line, so the preview doubles as a
//! checklist of what is still uncollected.

use std::fmt::Write;

use time::Date;
use time::format_description::FormatItem;
use time::macros::format_description;

use crate::fields::{FieldSet, PartyFields};

/// Blank line rendered for uncollected party members and signature dates.
pub const BLANK_LINE: &str = "_______________";

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const LONG_DATE: &[FormatItem<'static>] = format_description!("[month repr:long] [day padding:none], [year]");

// =============================================================================
// DATA
// =============================================================================

/// Nested MNDA field shape consumed by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MndaData {
    pub purpose: String,
    pub effective_date: String,
    pub term_type: String,
    pub term_years: String,
    pub confidentiality_term_type: String,
    pub confidentiality_term_years: String,
    pub governing_law: String,
    pub jurisdiction: String,
    pub party1: PartyFields,
    pub party2: PartyFields,
}

impl MndaData {
    /// Project the authoritative field store into the renderer shape.
    #[must_use]
    pub fn from_fields(fields: &FieldSet) -> Self {
        let scalar = |key: &str| fields.get(key).unwrap_or_default().to_string();
        Self {
            purpose: scalar("purpose"),
            effective_date: scalar("effectiveDate"),
            term_type: scalar("mndaTermType"),
            term_years: scalar("mndaTermYears"),
            confidentiality_term_type: scalar("confidentialityTermType"),
            confidentiality_term_years: scalar("confidentialityTermYears"),
            governing_law: scalar("governingLaw"),
            jurisdiction: scalar("jurisdiction"),
            party1: fields.party("party1").cloned().unwrap_or_default(),
            party2: fields.party("party2").cloned().unwrap_or_default(),
        }
    }
}

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Format an ISO `YYYY-MM-DD` date as e.g. `January 15, 2025`.
/// Empty input renders the `[Date]` placeholder; unparseable input renders
/// verbatim.
#[must_use]
pub fn format_long_date(iso: &str) -> String {
    if iso.is_empty() {
        return "[Date]".to_string();
    }
    let Ok(date) = Date::parse(iso, ISO_DATE) else {
        return iso.to_string();
    };
    date.format(LONG_DATE).unwrap_or_else(|_| iso.to_string())
}

/// Singular for exactly one year, plural otherwise (including non-numeric
/// input, which nothing downstream rounds or reformats).
fn year_word(count: &str) -> &'static str {
    let is_one = count
        .trim()
        .parse::<f64>()
        .is_ok_and(|v| (v - 1.0).abs() < f64::EPSILON);
    if is_one { "year" } else { "years" }
}

/// Cover-page sentence for the MNDA term.
fn term_sentence(data: &MndaData) -> String {
    if data.term_type == "expires" {
        format!(
            "Expires {} {} from Effective Date.",
            data.term_years,
            year_word(&data.term_years)
        )
    } else {
        "Continues until terminated in accordance with the terms of the MNDA.".to_string()
    }
}

/// Cover-page sentence for the confidentiality term.
fn confidentiality_sentence(data: &MndaData) -> String {
    if data.confidentiality_term_type == "fixed" {
        format!(
            "{} {} from Effective Date, but in the case of trade secrets until Confidential \
             Information is no longer considered a trade secret under applicable laws.",
            data.confidentiality_term_years,
            year_word(&data.confidentiality_term_years)
        )
    } else {
        "In perpetuity.".to_string()
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped value, or the bracketed placeholder when empty.
fn span(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        escape(value)
    }
}

// =============================================================================
// RENDER
// =============================================================================

/// Render the full MNDA document as HTML.
#[must_use]
pub fn render(data: &MndaData) -> String {
    let purpose = span(&data.purpose, "[Purpose]");
    let state = span(&data.governing_law, "[State]");
    let jurisdiction = span(&data.jurisdiction, "[Jurisdiction]");
    let effective_date = escape(&format_long_date(&data.effective_date));
    let term_text = escape(&term_sentence(data));
    let confidentiality_text = escape(&confidentiality_sentence(data));

    let mut out = String::with_capacity(8 * 1024);
    out.push_str("<div class=\"doc doc-mnda\">\n");
    out.push_str("<h1>Mutual Non-Disclosure Agreement</h1>\n");
    out.push_str(
        "<p class=\"doc-intro\">This Mutual Non-Disclosure Agreement (the \"MNDA\") consists of: \
         (1) this Cover Page and (2) the Common Paper Mutual NDA Standard Terms Version 1.0. Any \
         modifications of the Standard Terms should be made on the Cover Page, which will control \
         over conflicts with the Standard Terms.</p>\n",
    );

    cover_section(&mut out, "Purpose", Some("How Confidential Information may be used"), &purpose);
    cover_section(&mut out, "Effective Date", None, &effective_date);
    cover_section(&mut out, "MNDA Term", Some("The length of this MNDA"), &term_text);
    cover_section(
        &mut out,
        "Term of Confidentiality",
        Some("How long Confidential Information is protected"),
        &confidentiality_text,
    );

    let _ = writeln!(
        out,
        "<section>\n<h2>Governing Law &amp; Jurisdiction</h2>\n\
         <p><strong>Governing Law:</strong> {state}</p>\n\
         <p><strong>Jurisdiction:</strong> {jurisdiction}</p>\n</section>",
    );

    out.push_str("<section>\n<h2>Signatures</h2>\n<div class=\"doc-signatures\">\n");
    signature_block(&mut out, "Party 1", &data.party1);
    signature_block(&mut out, "Party 2", &data.party2);
    out.push_str("</div>\n</section>\n");

    standard_terms(&mut out, data, &purpose, &state, &jurisdiction, &effective_date, &confidentiality_text);

    out.push_str(
        "<p class=\"doc-footnote\">Common Paper Mutual Non-Disclosure Agreement Version 1.0, \
         free to use under CC BY 4.0</p>\n</div>\n",
    );
    out
}

fn cover_section(out: &mut String, heading: &str, note: Option<&str>, body: &str) {
    let _ = writeln!(out, "<section>\n<h2>{heading}</h2>");
    if let Some(note) = note {
        let _ = writeln!(out, "<p class=\"doc-note\">{note}</p>");
    }
    let _ = writeln!(out, "<p>{body}</p>\n</section>");
}

fn signature_block(out: &mut String, label: &str, party: &PartyFields) {
    let line = |value: &str| span(value, BLANK_LINE);
    let _ = writeln!(
        out,
        "<div class=\"doc-party\">\n<p class=\"doc-party-label\">{label}</p>\n\
         <p class=\"doc-signature-line\">Signature</p>\n\
         <p><span>Print Name:</span> {}</p>\n\
         <p><span>Title:</span> {}</p>\n\
         <p><span>Company:</span> {}</p>\n\
         <p><span>Notice Address:</span> {}</p>\n\
         <p><span>Date:</span> {BLANK_LINE}</p>\n</div>",
        line(&party.name),
        line(&party.title),
        line(&party.company),
        line(&party.notice_address),
    );
}

fn standard_terms(
    out: &mut String,
    data: &MndaData,
    purpose: &str,
    state: &str,
    jurisdiction: &str,
    effective_date: &str,
    confidentiality_text: &str,
) {
    let term_clause = if data.term_type == "expires" {
        format!(
            "expires {} {} from the Effective Date",
            escape(&data.term_years),
            year_word(&data.term_years)
        )
    } else {
        "continues until terminated".to_string()
    };

    out.push_str("<h2>Standard Terms</h2>\n<ol>\n");

    let _ = writeln!(
        out,
        "<li><strong>Introduction.</strong> This Mutual Non-Disclosure Agreement (which \
         incorporates these Standard Terms and the Cover Page) (\"MNDA\") allows each party \
         (\"Disclosing Party\") to disclose or make available information in connection with the \
         <em>{purpose}</em> which (1) the Disclosing Party identifies to the receiving party \
         (\"Receiving Party\") as \"confidential\", \"proprietary\", or the like or (2) should be \
         reasonably understood as confidential or proprietary due to its nature and the \
         circumstances of its disclosure (\"Confidential Information\"). Each party's Confidential \
         Information also includes the existence and status of the parties' discussions and \
         information on the Cover Page.</li>",
    );
    let _ = writeln!(
        out,
        "<li><strong>Use and Protection of Confidential Information.</strong> The Receiving Party \
         shall: (a) use Confidential Information solely for the <em>{purpose}</em>; (b) not \
         disclose Confidential Information to third parties without the Disclosing Party's prior \
         written approval, except that the Receiving Party may disclose Confidential Information \
         to its employees, agents, advisors, contractors and other representatives having a \
         reasonable need to know; and (c) protect Confidential Information using at least the same \
         protections the Receiving Party uses for its own similar information but no less than a \
         reasonable standard of care.</li>",
    );
    out.push_str(
        "<li><strong>Exceptions.</strong> The Receiving Party's obligations do not apply to \
         information that: (a) is or becomes publicly available through no fault of the Receiving \
         Party; (b) it rightfully knew or possessed prior to receipt without confidentiality \
         restrictions; (c) it rightfully obtained from a third party without confidentiality \
         restrictions; or (d) it independently developed without using or referencing the \
         Confidential Information.</li>\n",
    );
    out.push_str(
        "<li><strong>Disclosures Required by Law.</strong> The Receiving Party may disclose \
         Confidential Information to the extent required by law, provided (to the extent legally \
         permitted) it provides the Disclosing Party reasonable advance notice and reasonably \
         cooperates with efforts to obtain confidential treatment.</li>\n",
    );
    let _ = writeln!(
        out,
        "<li><strong>Term and Termination.</strong> This MNDA commences on {effective_date} and \
         {term_clause}. Either party may terminate this MNDA for any or no reason upon written \
         notice to the other party. The Receiving Party's obligations relating to Confidential \
         Information will survive for {}</li>",
        confidentiality_text.to_lowercase(),
    );
    out.push_str(
        "<li><strong>Return or Destruction of Confidential Information.</strong> Upon expiration \
         or termination, the Receiving Party will: (a) cease using Confidential Information; (b) \
         promptly destroy or return all Confidential Information; and (c) if requested, confirm \
         compliance in writing.</li>\n",
    );
    out.push_str(
        "<li><strong>Proprietary Rights.</strong> The Disclosing Party retains all intellectual \
         property and other rights in its Confidential Information and its disclosure grants no \
         license under such rights.</li>\n",
    );
    out.push_str(
        "<li><strong>Disclaimer.</strong> ALL CONFIDENTIAL INFORMATION IS PROVIDED \"AS IS\", WITH \
         ALL FAULTS, AND WITHOUT WARRANTIES, INCLUDING THE IMPLIED WARRANTIES OF TITLE, \
         MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE.</li>\n",
    );
    let _ = writeln!(
        out,
        "<li><strong>Governing Law and Jurisdiction.</strong> This MNDA is governed by the laws of \
         the State of <strong>{state}</strong>. Any legal proceedings must be instituted in the \
         courts located in <strong>{jurisdiction}</strong>.</li>",
    );
    out.push_str(
        "<li><strong>Equitable Relief.</strong> A breach of this MNDA may cause irreparable harm \
         for which monetary damages are an insufficient remedy. The Disclosing Party is entitled \
         to seek appropriate equitable relief, including an injunction.</li>\n",
    );
    out.push_str(
        "<li><strong>General.</strong> Neither party may assign this MNDA without prior written \
         consent, except in connection with a merger, reorganization, acquisition or transfer of \
         all or substantially all assets or voting securities. This MNDA constitutes the entire \
         agreement of the parties with respect to its subject matter.</li>\n",
    );
    out.push_str("</ol>\n");
}

#[cfg(test)]
#[path = "mnda_test.rs"]
mod tests;
