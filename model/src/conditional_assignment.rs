//! `ConditionalAssignmentImpl`: if a condition matches, copy listed source
//! fields to target fields, skipping any source that is unset.

use vpl_kernel::error::{LabelerError, LabelerResult};
use vpl_kernel::event::LabelerEvent;
use vpl_kernel::field_path::FieldPath;
use vpl_kernel::filter::Filter;

/// One `source_field -> target_field` assignment. Both fields resolve to
/// the same primitive kind, checked at build time.
pub struct Assignment {
    pub source: FieldPath,
    pub target: FieldPath,
}

pub struct ConditionalAssignmentImpl {
    condition: Filter,
    assignments: Vec<Assignment>,
}

impl ConditionalAssignmentImpl {
    /// Build from a condition and a non-empty list of assignments.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if `assignments` is empty
    /// or any assignment's source/target kinds do not match.
    pub fn build(condition: Filter, assignments: Vec<Assignment>) -> LabelerResult<Self> {
        if assignments.is_empty() {
            return Err(LabelerError::InvalidArgument(
                "conditional assignment requires at least one source/target pair".to_string(),
            ));
        }
        for assignment in &assignments {
            if assignment.source.kind() != assignment.target.kind() {
                return Err(LabelerError::InvalidArgument(format!(
                    "assignment {:?} -> {:?} has mismatched field kinds",
                    assignment.source, assignment.target
                )));
            }
        }
        Ok(Self {
            condition,
            assignments,
        })
    }

    /// Apply: if the condition matches, copy each set source field to its
    /// target. Never fails at runtime; an unmatched condition or an unset
    /// source is simply a no-op for that assignment.
    pub fn update(&self, event: &mut LabelerEvent) {
        if !self.condition.matches(event) {
            return;
        }
        for assignment in &self.assignments {
            if let Some(value) = assignment.source.get(event) {
                assignment.target.set(event, value);
            }
        }
    }
}
