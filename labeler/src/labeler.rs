//! `Labeler`: builds once from a compiled tree, then labels events
//! deterministically — every call's output depends only on the input and
//! the tree, never on external state or call order.

use vpl_kernel::canon::canonical_json_bytes;
use vpl_kernel::error::{LabelerError, LabelerResult};
use vpl_kernel::event::{LabelerEvent, LabelerInput, LabelerOutput};
use vpl_kernel::fingerprint::{fingerprint64, fingerprint64_str};
use vpl_model::node::ModelNode;

pub struct Labeler {
    root: ModelNode,
}

impl Labeler {
    #[must_use]
    pub fn build(root: ModelNode) -> Self {
        Self { root }
    }

    /// Label one event: fill derived fingerprints, derive the event's
    /// overall acting fingerprint, then walk the tree.
    ///
    /// # Errors
    ///
    /// Propagates any error the tree walk produces, or
    /// [`LabelerError::Internal`] if `input` cannot be canonicalized into
    /// the bytes its acting fingerprint is derived from.
    pub fn label(&self, mut input: LabelerInput) -> LabelerResult<LabelerOutput> {
        generate_fingerprints(&mut input);
        let acting_fingerprint = match input.event_id.as_ref().and_then(|e| e.id_fingerprint) {
            Some(id_fingerprint) => id_fingerprint,
            None => compute_acting_fingerprint(&input)?,
        };

        let mut event = LabelerEvent {
            labeler_input: input,
            acting_fingerprint,
            ..LabelerEvent::default()
        };
        self.root.apply(&mut event)?;

        Ok(LabelerOutput {
            people: event.virtual_person_activities,
            debug_trace: None,
        })
    }

    /// Label a batch of events independently; one input's failure does not
    /// prevent the others from being labeled.
    pub fn label_batch(&self, inputs: Vec<LabelerInput>) -> Vec<LabelerResult<LabelerOutput>> {
        inputs.into_iter().map(|input| self.label(input)).collect()
    }
}

/// Fill any unset `*_fingerprint` field whose raw id is present, leaving
/// already-populated fingerprints untouched.
fn generate_fingerprints(input: &mut LabelerInput) {
    if let Some(event_id) = &mut input.event_id {
        if event_id.id_fingerprint.is_none() {
            if let Some(id) = &event_id.id {
                event_id.id_fingerprint = Some(fingerprint64_str(id));
            }
        }
    }
    if let Some(profile) = &mut input.profile_info {
        for user_info in [
            &mut profile.email_user_info,
            &mut profile.phone_user_info,
            &mut profile.proprietary_id_space_1_user_info,
        ] {
            if let Some(user_info) = user_info {
                if user_info.user_id_fingerprint.is_none() {
                    if let Some(id) = &user_info.user_id {
                        user_info.user_id_fingerprint = Some(fingerprint64_str(id));
                    }
                }
            }
        }
    }
}

/// Fallback acting fingerprint for inputs with no `event_id.id`: the
/// canonicalized whole input, hashed. The specified derivation
/// (`acting_fingerprint = event_id.id_fingerprint`) only covers the
/// id-bearing case; this is an Open Question resolution for the rest.
fn compute_acting_fingerprint(input: &LabelerInput) -> LabelerResult<u64> {
    let value = serde_json::to_value(input)
        .map_err(|e| LabelerError::Internal(format!("labeler input is not serializable: {e}")))?;
    let bytes = canonical_json_bytes(&value)
        .map_err(|e| LabelerError::Internal(format!("labeler input is not canonicalizable: {e}")))?;
    Ok(fingerprint64(&bytes))
}
