//! `MultiplicityImpl`: computes a per-event clone count and per-clone
//! re-seeded fingerprint.

use vpl_kernel::error::{LabelerError, LabelerResult};
use vpl_kernel::event::LabelerEvent;
use vpl_kernel::field_path::{FieldPath, FieldValue};
use vpl_kernel::fingerprint::fingerprint64_str;

/// The source of the expected multiplicity: either a build-time constant or
/// a field resolved per event.
pub enum ExpectedMultiplicity {
    Constant(f64),
    Field(FieldPath),
}

pub struct MultiplicityImpl {
    expected_multiplicity: ExpectedMultiplicity,
    max_value: f64,
    cap_at_max: bool,
    person_index_field: FieldPath,
    random_seed: String,
}

impl MultiplicityImpl {
    /// Build a multiplicity config.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if `person_index_field`
    /// does not resolve to an integer field, or (for a field-sourced
    /// expectation) the field does not resolve to a numeric kind.
    pub fn build(
        expected_multiplicity: ExpectedMultiplicity,
        max_value: f64,
        cap_at_max: bool,
        person_index_field: FieldPath,
        random_seed: String,
    ) -> LabelerResult<Self> {
        if !person_index_field.kind().is_integer() {
            return Err(LabelerError::InvalidArgument(
                "multiplicity person_index_field must resolve to an integer field".to_string(),
            ));
        }
        if let ExpectedMultiplicity::Field(field) = &expected_multiplicity {
            let kind = field.kind();
            if kind != vpl_kernel::field_path::FieldKind::F64 && !kind.is_integer() {
                return Err(LabelerError::InvalidArgument(
                    "multiplicity expected_multiplicity_field must resolve to a numeric field"
                        .to_string(),
                ));
            }
        }
        Ok(Self {
            expected_multiplicity,
            max_value,
            cap_at_max,
            person_index_field,
            random_seed,
        })
    }

    #[must_use]
    pub fn person_index_field(&self) -> FieldPath {
        self.person_index_field
    }

    #[must_use]
    pub fn random_seed(&self) -> &str {
        &self.random_seed
    }

    /// Compute this event's clone count.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if the expectation is
    /// field-sourced and the field is unset. Returns
    /// [`LabelerError::OutOfRange`] if the expectation exceeds `max_value`
    /// with `cap_at_max` false, or is negative.
    pub fn compute_event_multiplicity(&self, event: &LabelerEvent) -> LabelerResult<i32> {
        let mut expected = match &self.expected_multiplicity {
            ExpectedMultiplicity::Constant(v) => *v,
            ExpectedMultiplicity::Field(field) => match field.get(event) {
                Some(FieldValue::F64(v)) => v,
                Some(FieldValue::I32(v)) => f64::from(v),
                Some(FieldValue::U64(v)) => v as f64,
                _ => {
                    return Err(LabelerError::InvalidArgument(
                        "multiplicity: expected_multiplicity_field is unset".to_string(),
                    ))
                }
            },
        };

        if expected > self.max_value {
            if self.cap_at_max {
                expected = self.max_value;
            } else {
                return Err(LabelerError::OutOfRange(format!(
                    "multiplicity {expected} exceeds max_value {}",
                    self.max_value
                )));
            }
        }
        if expected < 0.0 {
            return Err(LabelerError::OutOfRange(format!(
                "multiplicity {expected} is negative"
            )));
        }

        let event_seed = fingerprint64_str(&format!(
            "{}{}",
            self.random_seed, event.acting_fingerprint
        ));
        Ok(compute_bimodal_integer(expected, event_seed))
    }

    /// `GetFingerprintForIndex`: index 0 returns `input` unchanged; any
    /// other index re-derives a fingerprint from the original input, the
    /// clone index, and the random seed.
    #[must_use]
    pub fn fingerprint_for_index(&self, input: u64, index: i32) -> u64 {
        if index == 0 {
            input
        } else {
            fingerprint64_str(&format!("{}-clone-{index}-{input}", self.random_seed))
        }
    }
}

/// `floor(expectation) + (1 if seed < fractional_part * 2^64 else 0)`.
fn compute_bimodal_integer(expectation: f64, seed: u64) -> i32 {
    let floor_part = expectation.floor();
    let fractional_part = expectation - floor_part;
    let threshold = fractional_part * (u64::MAX as f64 + 1.0);
    let bump = i32::from(seed < threshold as u64);
    floor_part as i32 + bump
}
