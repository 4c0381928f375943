//! Closed, build-time-resolved field-path access over [`crate::event::LabelerEvent`].
//!
//! The record schema is not reflected over at runtime: every dotted path an
//! updater or filter names is resolved once, at build time, to a
//! [`FieldPath`] variant. An unrecognized path is a build error, never a
//! runtime one, matching "resolve at build time; never at apply time."

use crate::error::{LabelerError, LabelerResult};
use crate::event::{Gender, LabelerEvent};

/// The primitive type a [`FieldPath`] resolves to. `ConditionalAssignment`
/// requires source and target paths to share a `FieldKind`; `Multiplicity`
/// requires its `person_index_field` to be [`FieldKind::is_integer`]; the
/// geometric shredder requires its two fields to be [`FieldKind::U64`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    I32,
    U64,
    F64,
    String,
    Gender,
}

impl FieldKind {
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, Self::I32 | Self::U64)
    }
}

/// A resolved value read from or written to a [`FieldPath`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    I32(i32),
    U64(u64),
    F64(f64),
    String(String),
    Gender(Gender),
}

/// A closed set of known, pre-resolved field paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    ActingFingerprint,
    PersonCountryCode,
    EventIdId,
    EventIdIdFingerprint,
    ActingDemoGender,
    ActingDemoMinAge,
    ActingDemoMaxAge,
    CorrectedDemoGender,
    CorrectedDemoMinAge,
    CorrectedDemoMaxAge,
    MultiplicityPersonIndex,
    ExpectedMultiplicityValue,
}

impl FieldPath {
    /// Resolve a dotted path string to a known field.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if the path is not one of
    /// the fields this schema exposes.
    pub fn parse(path: &str) -> LabelerResult<Self> {
        Ok(match path {
            "acting_fingerprint" => Self::ActingFingerprint,
            "person_country_code" => Self::PersonCountryCode,
            "labeler_input.event_id.id" => Self::EventIdId,
            "labeler_input.event_id.id_fingerprint" => Self::EventIdIdFingerprint,
            "acting_demo.gender" => Self::ActingDemoGender,
            "acting_demo.min_age" => Self::ActingDemoMinAge,
            "acting_demo.max_age" => Self::ActingDemoMaxAge,
            "corrected_demo.gender" => Self::CorrectedDemoGender,
            "corrected_demo.min_age" => Self::CorrectedDemoMinAge,
            "corrected_demo.max_age" => Self::CorrectedDemoMaxAge,
            "multiplicity_person_index" => Self::MultiplicityPersonIndex,
            "expected_multiplicity_value" => Self::ExpectedMultiplicityValue,
            other => {
                return Err(LabelerError::InvalidArgument(format!(
                    "unknown field path: {other}"
                )))
            }
        })
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            Self::ActingFingerprint | Self::EventIdIdFingerprint => FieldKind::U64,
            Self::PersonCountryCode | Self::EventIdId => FieldKind::String,
            Self::ActingDemoGender | Self::CorrectedDemoGender => FieldKind::Gender,
            Self::ActingDemoMinAge
            | Self::ActingDemoMaxAge
            | Self::CorrectedDemoMinAge
            | Self::CorrectedDemoMaxAge
            | Self::MultiplicityPersonIndex => FieldKind::I32,
            Self::ExpectedMultiplicityValue => FieldKind::F64,
        }
    }

    /// Read the field's value, or `None` if unset.
    ///
    /// `acting_fingerprint` is always present (it has no unset state), so it
    /// is always `Some`.
    #[must_use]
    pub fn get(self, event: &LabelerEvent) -> Option<FieldValue> {
        match self {
            Self::ActingFingerprint => Some(FieldValue::U64(event.acting_fingerprint)),
            Self::PersonCountryCode => event
                .person_country_code
                .clone()
                .map(FieldValue::String),
            Self::EventIdId => event
                .labeler_input
                .event_id
                .as_ref()
                .and_then(|e| e.id.clone())
                .map(FieldValue::String),
            Self::EventIdIdFingerprint => event
                .labeler_input
                .event_id
                .as_ref()
                .and_then(|e| e.id_fingerprint)
                .map(FieldValue::U64),
            Self::ActingDemoGender => event.acting_demo.gender.map(FieldValue::Gender),
            Self::ActingDemoMinAge => event.acting_demo.min_age.map(FieldValue::I32),
            Self::ActingDemoMaxAge => event.acting_demo.max_age.map(FieldValue::I32),
            Self::CorrectedDemoGender => event.corrected_demo.gender.map(FieldValue::Gender),
            Self::CorrectedDemoMinAge => event.corrected_demo.min_age.map(FieldValue::I32),
            Self::CorrectedDemoMaxAge => event.corrected_demo.max_age.map(FieldValue::I32),
            Self::MultiplicityPersonIndex => {
                event.multiplicity_person_index.map(FieldValue::I32)
            }
            Self::ExpectedMultiplicityValue => {
                event.expected_multiplicity_value.map(FieldValue::F64)
            }
        }
    }

    /// Write a value into the field.
    ///
    /// # Panics
    ///
    /// Panics if `value`'s variant does not match `self.kind()`. Callers
    /// that resolved `value` from the same [`FieldPath`] (or validated
    /// kinds at build time, as every caller in this workspace does) cannot
    /// trigger this.
    pub fn set(self, event: &mut LabelerEvent, value: FieldValue) {
        match (self, value) {
            (Self::ActingFingerprint, FieldValue::U64(v)) => event.acting_fingerprint = v,
            (Self::PersonCountryCode, FieldValue::String(v)) => {
                event.person_country_code = Some(v);
            }
            (Self::EventIdId, FieldValue::String(v)) => {
                event.labeler_input.event_id.get_or_insert_with(Default::default).id = Some(v);
            }
            (Self::EventIdIdFingerprint, FieldValue::U64(v)) => {
                event
                    .labeler_input
                    .event_id
                    .get_or_insert_with(Default::default)
                    .id_fingerprint = Some(v);
            }
            (Self::ActingDemoGender, FieldValue::Gender(v)) => {
                event.acting_demo.gender = Some(v);
            }
            (Self::ActingDemoMinAge, FieldValue::I32(v)) => event.acting_demo.min_age = Some(v),
            (Self::ActingDemoMaxAge, FieldValue::I32(v)) => event.acting_demo.max_age = Some(v),
            (Self::CorrectedDemoGender, FieldValue::Gender(v)) => {
                event.corrected_demo.gender = Some(v);
            }
            (Self::CorrectedDemoMinAge, FieldValue::I32(v)) => {
                event.corrected_demo.min_age = Some(v);
            }
            (Self::CorrectedDemoMaxAge, FieldValue::I32(v)) => {
                event.corrected_demo.max_age = Some(v);
            }
            (Self::MultiplicityPersonIndex, FieldValue::I32(v)) => {
                event.multiplicity_person_index = Some(v);
            }
            (Self::ExpectedMultiplicityValue, FieldValue::F64(v)) => {
                event.expected_multiplicity_value = Some(v);
            }
            (path, value) => panic!("field kind mismatch: {path:?} cannot hold {value:?}"),
        }
    }
}
