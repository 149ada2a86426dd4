//! Field store — the authoritative document data and its merge engine.
//!
//! DESIGN
//! ======
//! Fields travel flat (`"party1Name": "Alice"`) but are stored nested:
//! party signatory details live in per-party sub-records so that a partial
//! update to one member never erases previously confirmed siblings. The
//! merge is a pure function over immutable snapshots; callers apply
//! partials in arrival order (last write wins per key).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Flat transport shape: field key to string value.
pub type FlatFields = BTreeMap<String, String>;

/// The party groups recognized by the nested-merge routing.
const PARTY_GROUPS: [&str; 2] = ["party1", "party2"];

// =============================================================================
// TYPES
// =============================================================================

/// Signatory details for one party. Empty string means "not yet collected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub notice_address: String,
}

impl PartyFields {
    fn member(&self, member: PartyMember) -> &str {
        match member {
            PartyMember::Name => &self.name,
            PartyMember::Title => &self.title,
            PartyMember::Company => &self.company,
            PartyMember::NoticeAddress => &self.notice_address,
        }
    }

    fn set_member(&mut self, member: PartyMember, value: &str) {
        let slot = match member {
            PartyMember::Name => &mut self.name,
            PartyMember::Title => &mut self.title,
            PartyMember::Company => &mut self.company,
            PartyMember::NoticeAddress => &mut self.notice_address,
        };
        value.clone_into(slot);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartyMember {
    Name,
    Title,
    Company,
    NoticeAddress,
}

impl PartyMember {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "Name" => Some(Self::Name),
            "Title" => Some(Self::Title),
            "Company" => Some(Self::Company),
            "NoticeAddress" => Some(Self::NoticeAddress),
            _ => None,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Title => "Title",
            Self::Company => "Company",
            Self::NoticeAddress => "NoticeAddress",
        }
    }
}

const PARTY_MEMBERS: [PartyMember; 4] = [
    PartyMember::Name,
    PartyMember::Title,
    PartyMember::Company,
    PartyMember::NoticeAddress,
];

/// Authoritative field store for the active document type.
///
/// Top-level scalars keep their transport key; party signatory fields are
/// routed into [`PartyFields`] sub-records keyed by group name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    scalars: BTreeMap<String, String>,
    parties: BTreeMap<String, PartyFields>,
}

// =============================================================================
// MERGE
// =============================================================================

/// Merge a flat partial into `current`, returning the next snapshot.
///
/// Scalar keys overwrite at the top level. Keys of the form
/// `party<N><Member>` (e.g. `party1Name`) overwrite only that member of the
/// party sub-record, preserving every other member already present for the
/// group. Keys absent from `partial` are never removed.
#[must_use]
pub fn merge(current: &FieldSet, partial: &FlatFields) -> FieldSet {
    let mut next = current.clone();
    for (key, value) in partial {
        match split_party_key(key) {
            Some((group, member)) => {
                next.parties
                    .entry(group.to_string())
                    .or_default()
                    .set_member(member, value);
            }
            None => {
                next.scalars.insert(key.clone(), value.clone());
            }
        }
    }
    next
}

/// Split a transport key into its party group and member, if it is one.
fn split_party_key(key: &str) -> Option<(&str, PartyMember)> {
    for group in PARTY_GROUPS {
        if let Some(suffix) = key.strip_prefix(group) {
            if let Some(member) = PartyMember::from_suffix(suffix) {
                return Some((&key[..group.len()], member));
            }
        }
    }
    None
}

// =============================================================================
// ACCESS & CONVERSION
// =============================================================================

impl FieldSet {
    /// Build a nested store from the flat transport shape.
    #[must_use]
    pub fn from_flat(flat: &FlatFields) -> Self {
        merge(&Self::default(), flat)
    }

    /// True when no field has been collected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.parties.is_empty()
    }

    /// Flat lookup by transport key, routing through party sub-records.
    /// Returns `None` for unset keys and for empty party members.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some((group, member)) = split_party_key(key) {
            let value = self.parties.get(group)?.member(member);
            return if value.is_empty() { None } else { Some(value) };
        }
        self.scalars.get(key).map(String::as_str)
    }

    /// The sub-record for a party group (`"party1"` / `"party2"`), if any
    /// member of it has been collected.
    #[must_use]
    pub fn party(&self, group: &str) -> Option<&PartyFields> {
        self.parties.get(group)
    }

    /// Serialize back to the flat transport shape. Empty party members are
    /// omitted; scalars pass through as stored.
    #[must_use]
    pub fn to_flat(&self) -> FlatFields {
        let mut flat = self.scalars.clone();
        for (group, party) in &self.parties {
            for member in PARTY_MEMBERS {
                let value = party.member(member);
                if !value.is_empty() {
                    flat.insert(format!("{group}{}", member.suffix()), value.to_string());
                }
            }
        }
        flat
    }
}

#[cfg(test)]
#[path = "fields_test.rs"]
mod tests;
