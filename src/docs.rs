//! Document type registry — schema, prompt and template per agreement.
//!
//! DESIGN
//! ======
//! One static table drives everything that varies by document type: the
//! field schema the assistant extracts into, the system prompt it drafts
//! with, the cover-page template the preview renders, and the required-field
//! validation that gates export. The reserved `unknown` type runs the
//! classifier flow and suppresses preview rendering.

use crate::fields::FieldSet;
use crate::prompts;

/// Reserved document type meaning "not yet determined".
pub const UNKNOWN: &str = "unknown";

/// Default document type when a hand-off snapshot predates typed sessions.
pub const DEFAULT_DOC_TYPE: &str = "mnda";

/// Classifier pseudo-field carrying the detected document type.
pub const DETECTED_DOC_TYPE_FIELD: &str = "detectedDocType";

// =============================================================================
// CONFIG TABLE
// =============================================================================

/// Static configuration for one document type.
pub struct DocConfig {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Transport-shape field keys of the extraction schema.
    pub fields: &'static [&'static str],
    /// Fields the export gate allows to stay blank.
    pub optional: &'static [&'static str],
    pub prompt: &'static str,
    /// Markdown cover page; `None` renders the missing-template notice.
    pub cover_template: Option<&'static str>,
}

pub static REGISTRY: &[DocConfig] = &[
    DocConfig {
        key: "mnda",
        name: "Mutual NDA",
        description: "Standard mutual non-disclosure agreement for two parties sharing confidential information.",
        fields: &[
            "purpose",
            "effectiveDate",
            "mndaTermType",
            "mndaTermYears",
            "confidentialityTermType",
            "confidentialityTermYears",
            "governingLaw",
            "jurisdiction",
            "party1Name",
            "party1Title",
            "party1Company",
            "party1NoticeAddress",
            "party2Name",
            "party2Title",
            "party2Company",
            "party2NoticeAddress",
        ],
        optional: &[],
        prompt: prompts::MNDA,
        cover_template: Some(include_str!("../templates/cover-pages/mnda.md")),
    },
    DocConfig {
        key: "csa",
        name: "Cloud Service Agreement",
        description: "Comprehensive agreement for selling and buying cloud software and SaaS products.",
        fields: &[
            "providerName",
            "customerName",
            "effectiveDate",
            "governingLaw",
            "chosenCourts",
            "subscriptionPeriod",
            "paymentProcess",
            "generalCapAmount",
        ],
        optional: &[],
        prompt: prompts::CSA,
        cover_template: Some(include_str!("../templates/cover-pages/csa.md")),
    },
    DocConfig {
        key: "sla",
        name: "Service Level Agreement",
        description: "Defines uptime and response time commitments for cloud services, including remedies.",
        fields: &[
            "providerName",
            "customerName",
            "targetUptime",
            "targetResponseTime",
            "supportChannel",
            "uptimeCredit",
            "responseTimeCredit",
            "scheduledDowntime",
        ],
        optional: &[],
        prompt: prompts::SLA,
        cover_template: Some(include_str!("../templates/cover-pages/sla.md")),
    },
    DocConfig {
        key: "design_partner",
        name: "Design Partner Agreement",
        description: "Gives a partner early product access in exchange for structured feedback.",
        fields: &[
            "providerName",
            "partnerName",
            "effectiveDate",
            "term",
            "program",
            "governingLaw",
            "chosenCourts",
        ],
        optional: &[],
        prompt: prompts::DESIGN_PARTNER,
        cover_template: Some(include_str!("../templates/cover-pages/design_partner.md")),
    },
    DocConfig {
        key: "psa",
        name: "Professional Services Agreement",
        description: "Governs professional services engagements via statements of work.",
        fields: &[
            "providerName",
            "customerName",
            "effectiveDate",
            "governingLaw",
            "chosenCourts",
            "generalCapAmount",
        ],
        optional: &[],
        prompt: prompts::PSA,
        cover_template: Some(include_str!("../templates/cover-pages/psa.md")),
    },
    DocConfig {
        key: "dpa",
        name: "Data Processing Agreement",
        description: "GDPR-compliant agreement governing how personal data is processed.",
        fields: &[
            "providerName",
            "customerName",
            "categoriesOfPersonalData",
            "categoriesOfDataSubjects",
            "governingMemberState",
            "securityPolicy",
        ],
        optional: &[],
        prompt: prompts::DPA,
        cover_template: Some(include_str!("../templates/cover-pages/dpa.md")),
    },
    DocConfig {
        key: "partnership",
        name: "Partnership Agreement",
        description: "Formalizes co-marketing and business partnership arrangements.",
        fields: &[
            "companyName",
            "partnerName",
            "effectiveDate",
            "endDate",
            "obligations",
            "territory",
            "governingLaw",
            "chosenCourts",
        ],
        optional: &[],
        prompt: prompts::PARTNERSHIP,
        cover_template: Some(include_str!("../templates/cover-pages/partnership.md")),
    },
    DocConfig {
        key: "software_license",
        name: "Software License Agreement",
        description: "Licenses on-premise or installed software to a customer.",
        fields: &[
            "providerName",
            "customerName",
            "effectiveDate",
            "subscriptionPeriod",
            "permittedUses",
            "governingLaw",
            "chosenCourts",
        ],
        optional: &[],
        prompt: prompts::SOFTWARE_LICENSE,
        cover_template: Some(include_str!("../templates/cover-pages/software_license.md")),
    },
    DocConfig {
        key: "pilot",
        name: "Pilot Agreement",
        description: "Short-term product evaluation agreement before a full commercial deal.",
        fields: &[
            "providerName",
            "customerName",
            "effectiveDate",
            "pilotPeriod",
            "governingLaw",
            "chosenCourts",
        ],
        optional: &[],
        prompt: prompts::PILOT,
        cover_template: Some(include_str!("../templates/cover-pages/pilot.md")),
    },
    DocConfig {
        key: "baa",
        name: "Business Associate Agreement",
        description: "HIPAA-compliant agreement governing handling of protected health information.",
        fields: &[
            "providerName",
            "companyName",
            "baaEffectiveDate",
            "breachNotificationPeriod",
            "limitations",
        ],
        optional: &["limitations"],
        prompt: prompts::BAA,
        cover_template: Some(include_str!("../templates/cover-pages/baa.md")),
    },
    DocConfig {
        key: "ai_addendum",
        name: "AI Addendum",
        description: "Addendum for agreements involving AI/ML services, covering data use and IP.",
        fields: &[
            "providerName",
            "customerName",
            "trainingData",
            "trainingPurposes",
            "trainingRestrictions",
        ],
        optional: &["trainingData", "trainingPurposes", "trainingRestrictions"],
        prompt: prompts::AI_ADDENDUM,
        cover_template: Some(include_str!("../templates/cover-pages/ai_addendum.md")),
    },
    DocConfig {
        key: UNKNOWN,
        name: "Unknown",
        description: "Classifier flow: identifies which supported agreement the user needs.",
        fields: &[DETECTED_DOC_TYPE_FIELD],
        optional: &[DETECTED_DOC_TYPE_FIELD],
        prompt: prompts::CLASSIFIER,
        cover_template: None,
    },
];

// =============================================================================
// LOOKUP
// =============================================================================

/// Config for a document type key, if registered.
#[must_use]
pub fn config(key: &str) -> Option<&'static DocConfig> {
    REGISTRY.iter().find(|c| c.key == key)
}

/// Config for a key, falling back to the classifier config for strays.
#[must_use]
pub fn config_or_unknown(key: &str) -> &'static DocConfig {
    config(key).unwrap_or_else(|| config(UNKNOWN).expect("unknown doc type is registered"))
}

/// The user-selectable document types (everything but `unknown`).
pub fn supported() -> impl Iterator<Item = &'static DocConfig> {
    REGISTRY.iter().filter(|c| c.key != UNKNOWN)
}

/// Display name for a key; generic fallback for unregistered strays.
#[must_use]
pub fn display_name(key: &str) -> &'static str {
    config(key).map_or("Document", |c| c.name)
}

/// True when the document type is still undetermined.
#[must_use]
pub fn is_undetermined(key: &str) -> bool {
    key == UNKNOWN
}

/// Document types rendered by the in-process renderer rather than the
/// preview endpoint.
#[must_use]
pub fn is_client_rendered(key: &str) -> bool {
    key == "mnda"
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Required fields still missing before export, in schema order.
///
/// The MNDA term-year fields are conditional: only required while their
/// term mode actually counts years.
#[must_use]
pub fn missing_required(key: &str, fields: &FieldSet) -> Vec<&'static str> {
    let Some(cfg) = config(key) else {
        return Vec::new();
    };
    if cfg.key == UNKNOWN {
        return Vec::new();
    }

    cfg.fields
        .iter()
        .copied()
        .filter(|field| !cfg.optional.contains(field))
        .filter(|field| match *field {
            "mndaTermYears" => fields.get("mndaTermType") == Some("expires"),
            "confidentialityTermYears" => fields.get("confidentialityTermType") == Some("fixed"),
            _ => true,
        })
        .filter(|field| fields.get(field).is_none())
        .collect()
}

// =============================================================================
// STRUCTURED OUTPUT SCHEMA
// =============================================================================

/// JSON schema for the assistant's structured turn reply:
/// `{ reply: string, fields: { <schema keys>: string|null } }`.
#[must_use]
pub fn response_schema(cfg: &DocConfig) -> serde_json::Value {
    let mut properties = serde_json::Map::new();
    for field in cfg.fields {
        properties.insert(
            (*field).to_string(),
            serde_json::json!({ "type": ["string", "null"] }),
        );
    }
    let required: Vec<&str> = cfg.fields.to_vec();

    serde_json::json!({
        "type": "object",
        "properties": {
            "reply": { "type": "string" },
            "fields": {
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false
            }
        },
        "required": ["reply", "fields"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldSet, FlatFields};

    fn field_set(pairs: &[(&str, &str)]) -> FieldSet {
        let flat: FlatFields = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        FieldSet::from_flat(&flat)
    }

    #[test]
    fn registry_covers_all_supported_types() {
        assert_eq!(supported().count(), 11);
        assert!(config(UNKNOWN).is_some());
    }

    #[test]
    fn every_supported_type_has_prompt_and_schema() {
        for cfg in supported() {
            assert!(!cfg.prompt.is_empty(), "{} prompt", cfg.key);
            assert!(!cfg.fields.is_empty(), "{} schema", cfg.key);
            assert!(!cfg.name.is_empty(), "{} name", cfg.key);
            assert!(cfg.cover_template.is_some(), "{} template", cfg.key);
        }
    }

    #[test]
    fn unknown_key_falls_back_to_classifier() {
        let cfg = config_or_unknown("not-a-doc");
        assert_eq!(cfg.key, UNKNOWN);
        assert_eq!(cfg.fields, &[DETECTED_DOC_TYPE_FIELD]);
    }

    #[test]
    fn display_name_falls_back_to_generic() {
        assert_eq!(display_name("mnda"), "Mutual NDA");
        assert_eq!(display_name("not-a-doc"), "Document");
    }

    #[test]
    fn missing_required_lists_empty_fields_in_order() {
        let fields = field_set(&[("providerName", "Acme Corp")]);
        let missing = missing_required("pilot", &fields);
        assert_eq!(
            missing,
            vec!["customerName", "effectiveDate", "pilotPeriod", "governingLaw", "chosenCourts"]
        );
    }

    #[test]
    fn missing_required_skips_optional_fields() {
        let fields = field_set(&[
            ("providerName", "Acme Health"),
            ("companyName", "Mercy Hospital"),
            ("baaEffectiveDate", "2025-03-01"),
            ("breachNotificationPeriod", "within 60 days"),
        ]);
        assert!(missing_required("baa", &fields).is_empty());
    }

    #[test]
    fn mnda_term_years_required_only_when_expiring() {
        let ongoing = field_set(&[("mndaTermType", "ongoing")]);
        assert!(!missing_required("mnda", &ongoing).contains(&"mndaTermYears"));

        let expires = field_set(&[("mndaTermType", "expires")]);
        assert!(missing_required("mnda", &expires).contains(&"mndaTermYears"));
    }

    #[test]
    fn confidentiality_years_required_only_when_fixed() {
        let perpetuity = field_set(&[("confidentialityTermType", "perpetuity")]);
        assert!(!missing_required("mnda", &perpetuity).contains(&"confidentialityTermYears"));

        let fixed = field_set(&[("confidentialityTermType", "fixed")]);
        assert!(missing_required("mnda", &fixed).contains(&"confidentialityTermYears"));
    }

    #[test]
    fn unknown_type_has_no_required_fields() {
        assert!(missing_required(UNKNOWN, &FieldSet::default()).is_empty());
        assert!(missing_required("not-a-doc", &FieldSet::default()).is_empty());
    }

    #[test]
    fn response_schema_includes_reply_and_all_fields() {
        let cfg = config("pilot").unwrap();
        let schema = response_schema(cfg);
        assert_eq!(schema["required"], serde_json::json!(["reply", "fields"]));
        let field_props = &schema["properties"]["fields"]["properties"];
        for field in cfg.fields {
            assert!(field_props.get(*field).is_some(), "missing {field}");
        }
    }
}
