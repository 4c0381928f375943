//! The record model: `LabelerInput`, the mutable scratch `LabelerEvent`
//! the tree evaluates, and `LabelerOutput`.
//!
//! Optionality is represented with `Option<T>` on every field that can be
//! unset, matching the specification's "preserving unset/set distinction"
//! requirement for field-mask projection and conditional updaters.

use serde::{Deserialize, Serialize};

/// Demographic gender, a closed enumeration (one of the primitive types
/// `ConditionalAssignment` is allowed to copy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Unspecified,
    Male,
    Female,
}

/// A demographic bucket: gender plus an age range, each field independently
/// optional so a partially-populated demo (e.g. gender set, age unset) is
/// representable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographic {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_age: Option<i32>,
}

impl Demographic {
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.gender.is_none() && self.min_age.is_none() && self.max_age.is_none()
    }
}

/// One identity assignment produced for an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualPersonActivity {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub virtual_person_id: Option<i64>,
    #[serde(default)]
    pub demo: Demographic,
}

/// A single identifier and its derived fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id_fingerprint: Option<u64>,
}

/// The event identity: a raw id plus its derived fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventId {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id_fingerprint: Option<u64>,
}

/// Per-identity-space user info attached to a profile record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInfo {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email_user_info: Option<UserInfo>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone_user_info: Option<UserInfo>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub proprietary_id_space_1_user_info: Option<UserInfo>,
}

/// The caller-supplied input to one `Labeler::label` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelerInput {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub event_id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub profile_info: Option<ProfileInfo>,
}

/// The mutable scratch record the tree evaluates for one `label` call (or
/// one multiplicity clone of it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelerEvent {
    #[serde(default)]
    pub labeler_input: LabelerInput,
    /// Seed material the tree consumes for every hashing decision. Managed
    /// exclusively by fingerprint derivation and multiplicity cloning, never
    /// by `merge_from`.
    #[serde(default)]
    pub acting_fingerprint: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub person_country_code: Option<String>,
    #[serde(default)]
    pub acting_demo: Demographic,
    #[serde(default)]
    pub corrected_demo: Demographic,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub multiplicity_person_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expected_multiplicity_value: Option<f64>,
    #[serde(default)]
    pub virtual_person_activities: Vec<VirtualPersonActivity>,
}

impl LabelerEvent {
    /// Merge `other` into `self`: scalar fields overwrite when set in
    /// `other`, `virtual_person_activities` is concatenated, and
    /// `Demographic` sub-fields merge independently per field. `other` is
    /// typically a sparse row/column template carried by an updater, not a
    /// full event.
    pub fn merge_from(&mut self, other: &LabelerEvent) {
        if let Some(country) = &other.person_country_code {
            self.person_country_code = Some(country.clone());
        }
        merge_demo(&mut self.acting_demo, &other.acting_demo);
        merge_demo(&mut self.corrected_demo, &other.corrected_demo);
        if let Some(index) = other.multiplicity_person_index {
            self.multiplicity_person_index = Some(index);
        }
        if let Some(value) = other.expected_multiplicity_value {
            self.expected_multiplicity_value = Some(value);
        }
        self.virtual_person_activities
            .extend(other.virtual_person_activities.iter().cloned());
    }
}

fn merge_demo(target: &mut Demographic, other: &Demographic) {
    if let Some(gender) = other.gender {
        target.gender = Some(gender);
    }
    if let Some(min_age) = other.min_age {
        target.min_age = Some(min_age);
    }
    if let Some(max_age) = other.max_age {
        target.max_age = Some(max_age);
    }
}

/// The activities produced by one `Labeler::label` call, plus an optional
/// development-only selection trace always cleared before leaving the
/// façade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelerOutput {
    pub people: Vec<VirtualPersonActivity>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub debug_trace: Option<String>,
}
