//! `GeometricShredderImpl`: probabilistically overwrite a u64 field with a
//! derived hash, collapsing a geometrically-distributed fraction of events
//! onto the same derived identifier.

use vpl_kernel::error::{LabelerError, LabelerResult};
use vpl_kernel::event::LabelerEvent;
use vpl_kernel::field_path::{FieldKind, FieldPath, FieldValue};
use vpl_kernel::fingerprint::{exp_hash, fingerprint64_str};

pub struct GeometricShredderImpl {
    psi: f64,
    randomness_field: FieldPath,
    target_field: FieldPath,
    random_seed: String,
}

impl GeometricShredderImpl {
    /// Build from `psi` and the two field paths.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if `psi` is outside
    /// `[0, 1]` or either field does not resolve to
    /// [`FieldKind::U64`].
    pub fn build(
        psi: f64,
        randomness_field: FieldPath,
        target_field: FieldPath,
        random_seed: String,
    ) -> LabelerResult<Self> {
        if !(0.0..=1.0).contains(&psi) {
            return Err(LabelerError::InvalidArgument(format!(
                "geometric shredder psi {psi} is outside [0, 1]"
            )));
        }
        for (name, field) in [("randomness_field", randomness_field), ("target_field", target_field)] {
            if field.kind() != FieldKind::U64 {
                return Err(LabelerError::InvalidArgument(format!(
                    "geometric shredder {name} must resolve to a u64 field"
                )));
            }
        }
        Ok(Self {
            psi,
            randomness_field,
            target_field,
            random_seed,
        })
    }

    /// Apply the shredder to `event`.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if `randomness_field` is
    /// unset, or if `target_field` is unset while `shred_hash != 0`.
    pub fn update(&self, event: &mut LabelerEvent) -> LabelerResult<()> {
        let randomness = match self.randomness_field.get(event) {
            Some(FieldValue::U64(v)) => v,
            _ => {
                return Err(LabelerError::InvalidArgument(
                    "geometric shredder: randomness field is unset".to_string(),
                ))
            }
        };

        let shred_hash = self.shred_hash(randomness);
        if shred_hash == 0 {
            return Ok(());
        }

        let target = match self.target_field.get(event) {
            Some(FieldValue::U64(v)) => v,
            _ => {
                return Err(LabelerError::InvalidArgument(
                    "geometric shredder: target field is unset".to_string(),
                ))
            }
        };

        let full_seed = format!("{target}-shred-{shred_hash}-{}", self.random_seed);
        let shredded = fingerprint64_str(&full_seed);
        self.target_field.set(event, FieldValue::U64(shredded));
        Ok(())
    }

    fn shred_hash(&self, randomness: u64) -> u64 {
        if self.psi == 0.0 {
            0
        } else if self.psi == 1.0 {
            randomness
        } else {
            let exp = exp_hash(&randomness.to_string());
            (exp / -self.psi.ln()).floor() as u64
        }
    }
}
