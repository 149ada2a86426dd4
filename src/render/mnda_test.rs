use super::*;
use crate::fields::{FieldSet, FlatFields};

fn base_data() -> MndaData {
    MndaData {
        purpose: "Evaluating a potential partnership".to_string(),
        effective_date: "2025-01-15".to_string(),
        term_type: "expires".to_string(),
        term_years: "2".to_string(),
        confidentiality_term_type: "fixed".to_string(),
        confidentiality_term_years: "3".to_string(),
        governing_law: "Delaware".to_string(),
        jurisdiction: "Wilmington, Delaware".to_string(),
        party1: PartyFields {
            name: "Alice Smith".to_string(),
            title: "CEO".to_string(),
            company: "Alpha Inc".to_string(),
            notice_address: "1 Alpha St".to_string(),
        },
        party2: PartyFields {
            name: "Bob Jones".to_string(),
            title: "CTO".to_string(),
            company: "Beta LLC".to_string(),
            notice_address: "2 Beta Ave".to_string(),
        },
    }
}

// =========================================================================
// format_long_date
// =========================================================================

#[test]
fn date_formats_as_long_month_day_year() {
    assert_eq!(format_long_date("2025-01-15"), "January 15, 2025");
    assert_eq!(format_long_date("2024-12-01"), "December 1, 2024");
}

#[test]
fn empty_date_renders_placeholder() {
    assert_eq!(format_long_date(""), "[Date]");
}

#[test]
fn unparseable_date_renders_verbatim() {
    assert_eq!(format_long_date("next Tuesday"), "next Tuesday");
}

// =========================================================================
// term sentences
// =========================================================================

#[test]
fn one_year_term_is_singular() {
    let mut data = base_data();
    data.term_years = "1".to_string();
    let html = render(&data);
    assert!(html.contains("Expires 1 year from Effective Date."));
    assert!(!html.contains("Expires 1 years"));
}

#[test]
fn non_unit_terms_are_plural() {
    for years in ["2", "0", "10"] {
        let mut data = base_data();
        data.term_years = years.to_string();
        data.confidentiality_term_years = years.to_string();
        let html = render(&data);
        assert!(html.contains(&format!("Expires {years} years from Effective Date.")), "term {years}");
        assert!(html.contains(&format!("{years} years from Effective Date, but in the case of trade secrets")));
    }
}

#[test]
fn ongoing_term_renders_fixed_sentence() {
    let mut data = base_data();
    data.term_type = "ongoing".to_string();
    let html = render(&data);
    assert!(html.contains("Continues until terminated in accordance with the terms of the MNDA."));
    assert!(html.contains("commences on January 15, 2025 and continues until terminated."));
}

#[test]
fn expiring_term_appears_in_termination_clause() {
    let html = render(&base_data());
    assert!(html.contains("expires 2 years from the Effective Date"));
}

#[test]
fn perpetuity_confidentiality_renders_fixed_sentence() {
    let mut data = base_data();
    data.confidentiality_term_type = "perpetuity".to_string();
    let html = render(&data);
    assert!(html.contains("In perpetuity."));
    assert!(html.contains("will survive for in perpetuity."));
}

// =========================================================================
// placeholders
// =========================================================================

#[test]
fn missing_scalars_render_bracketed_placeholders() {
    let mut data = base_data();
    data.purpose = String::new();
    data.governing_law = String::new();
    data.jurisdiction = String::new();
    data.effective_date = String::new();
    let html = render(&data);
    assert!(html.contains("[Purpose]"));
    assert!(html.contains("[State]"));
    assert!(html.contains("[Jurisdiction]"));
    assert!(html.contains("[Date]"));
}

#[test]
fn placeholders_appear_in_cover_and_clause_text() {
    let mut data = base_data();
    data.purpose = String::new();
    data.governing_law = String::new();
    data.jurisdiction = String::new();
    let html = render(&data);
    assert!(html.matches("[Purpose]").count() >= 2, "cover section plus clauses 1 and 2");
    assert!(html.matches("[State]").count() >= 2);
    assert!(html.matches("[Jurisdiction]").count() >= 2);
}

#[test]
fn filled_purpose_appears_in_cover_and_clauses() {
    let html = render(&base_data());
    assert!(html.matches("Evaluating a potential partnership").count() >= 3);
}

#[test]
fn missing_party_members_render_blank_lines() {
    let mut data = base_data();
    data.party2 = PartyFields::default();
    let html = render(&data);
    assert!(html.contains(BLANK_LINE));
    assert!(html.contains("Alice Smith"));
    assert!(!html.contains("Bob Jones"));
}

// =========================================================================
// structure
// =========================================================================

#[test]
fn renders_exactly_eleven_clauses() {
    let filled = render(&base_data());
    let empty = render(&MndaData::default());
    assert_eq!(filled.matches("<li>").count(), 11);
    assert_eq!(empty.matches("<li>").count(), 11);
}

#[test]
fn signature_blocks_show_party_details() {
    let html = render(&base_data());
    for value in ["Alice Smith", "CEO", "Alpha Inc", "1 Alpha St", "Bob Jones", "CTO", "Beta LLC", "2 Beta Ave"] {
        assert!(html.contains(value), "missing {value}");
    }
}

#[test]
fn signature_date_lines_stay_blank() {
    let html = render(&base_data());
    // One blank per party for the signature date, even with all fields filled.
    assert!(html.matches(BLANK_LINE).count() >= 2);
}

#[test]
fn field_values_are_html_escaped() {
    let mut data = base_data();
    data.purpose = "R&D <evaluation>".to_string();
    let html = render(&data);
    assert!(html.contains("R&amp;D &lt;evaluation&gt;"));
    assert!(!html.contains("<evaluation>"));
}

// =========================================================================
// from_fields
// =========================================================================

#[test]
fn from_fields_projects_nested_shape() {
    let flat = FlatFields::from([
        ("purpose".to_string(), "Due diligence".to_string()),
        ("mndaTermType".to_string(), "expires".to_string()),
        ("mndaTermYears".to_string(), "1".to_string()),
        ("party1Name".to_string(), "Alice Smith".to_string()),
        ("party1Company".to_string(), "Alpha Inc".to_string()),
    ]);
    let data = MndaData::from_fields(&FieldSet::from_flat(&flat));
    assert_eq!(data.purpose, "Due diligence");
    assert_eq!(data.term_type, "expires");
    assert_eq!(data.party1.name, "Alice Smith");
    assert_eq!(data.party1.company, "Alpha Inc");
    assert_eq!(data.party1.title, "");
    assert_eq!(data.party2, PartyFields::default());
}

#[test]
fn empty_fields_render_without_panicking() {
    let html = render(&MndaData::from_fields(&FieldSet::default()));
    assert!(html.contains("Mutual Non-Disclosure Agreement"));
    assert!(html.contains("In perpetuity."));
    assert!(html.contains("Continues until terminated"));
}
