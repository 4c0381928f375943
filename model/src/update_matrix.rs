//! `UpdateMatrixHelper::SelectFromMatrix` and the dense `UpdateMatrixImpl`.
//!
//! A dense update matrix is a set of column templates (matched against the
//! event) crossed with row templates (merged into the event on a match),
//! with a probability distribution over rows per column.

use vpl_kernel::distributed_hash::DistributedConsistentHashing;
use vpl_kernel::error::{LabelerError, LabelerResult};
use vpl_kernel::event::LabelerEvent;

use crate::matcher::{ColumnMatcher, NO_MATCH};

/// `{column_index, row_index}`, or `{NO_MATCH, NO_MATCH}` if no column
/// matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixSelection {
    pub column_index: i32,
    pub row_index: i32,
}

const NO_MATCH_SELECTION: MatrixSelection = MatrixSelection {
    column_index: NO_MATCH,
    row_index: NO_MATCH,
};

/// Shared by [`UpdateMatrixImpl`], `SparseUpdateMatrixImpl`, and
/// `BranchNode`'s condition-free hashing path is NOT this helper (branches
/// hash directly); this is specific to the matrix-style updaters.
///
/// # Errors
///
/// Propagates the column matcher's error. Returns
/// [`LabelerError::Internal`] if the matched column index is out of range
/// of `row_hashings` (impossible for a correctly built matrix).
pub fn select_from_matrix(
    column_matcher: &ColumnMatcher,
    row_hashings: &[DistributedConsistentHashing],
    random_seed: &str,
    event: &LabelerEvent,
) -> LabelerResult<MatrixSelection> {
    let column_index = column_matcher.match_index(event)?;
    if column_index == NO_MATCH {
        return Ok(NO_MATCH_SELECTION);
    }

    let hashing = row_hashings.get(column_index as usize).ok_or_else(|| {
        LabelerError::Internal(format!(
            "matched column index {column_index} is out of range of {} row hashings",
            row_hashings.len()
        ))
    })?;

    let seed = format!("{random_seed}{}", event.acting_fingerprint);
    let row_index = hashing.hash(&seed);

    Ok(MatrixSelection {
        column_index,
        row_index,
    })
}

/// A dense update matrix: `row_templates[r]` merged into the event with
/// probability `probabilities[r * num_columns + c]` given column `c`
/// matched.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateMatrixImpl {
    column_matcher: ColumnMatcher,
    row_hashings: Vec<DistributedConsistentHashing>,
    row_templates: Vec<LabelerEvent>,
    random_seed: String,
    pass_through_non_matches: bool,
}

impl UpdateMatrixImpl {
    /// Build a dense update matrix.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if
    /// `probabilities.len() != row_templates.len() * num_columns`, where
    /// `num_columns` is derived from the column matcher's shape (the number
    /// of distributed-consistent-hashing instances to build, one per
    /// column).
    pub fn build(
        column_matcher: ColumnMatcher,
        num_columns: usize,
        row_templates: Vec<LabelerEvent>,
        probabilities: &[f64],
        random_seed: String,
        pass_through_non_matches: bool,
    ) -> LabelerResult<Self> {
        let num_rows = row_templates.len();
        if num_rows == 0 || num_columns == 0 {
            return Err(LabelerError::InvalidArgument(
                "update matrix requires at least one row and one column".to_string(),
            ));
        }
        if probabilities.len() != num_rows * num_columns {
            return Err(LabelerError::InvalidArgument(format!(
                "update matrix has {} probabilities, expected {} rows * {} columns = {}",
                probabilities.len(),
                num_rows,
                num_columns,
                num_rows * num_columns
            )));
        }

        let mut row_hashings = Vec::with_capacity(num_columns);
        for column in 0..num_columns {
            let choices = (0..num_rows)
                .map(|row| vpl_kernel::distributed_hash::WeightedChoice {
                    choice_id: row as i32,
                    probability: probabilities[row * num_columns + column],
                })
                .collect();
            row_hashings.push(DistributedConsistentHashing::build(choices)?);
        }

        Ok(Self {
            column_matcher,
            row_hashings,
            row_templates,
            random_seed,
            pass_through_non_matches,
        })
    }

    /// Apply the matrix to `event`: select a row via
    /// [`select_from_matrix`], then merge it in.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if no column matched and
    /// `pass_through_non_matches` is false.
    pub fn update(&self, event: &mut LabelerEvent) -> LabelerResult<()> {
        let selection =
            select_from_matrix(&self.column_matcher, &self.row_hashings, &self.random_seed, event)?;

        if selection.column_index == NO_MATCH {
            return if self.pass_through_non_matches {
                Ok(())
            } else {
                Err(LabelerError::InvalidArgument(
                    "update matrix: no column matched the event".to_string(),
                ))
            };
        }

        event.merge_from(&self.row_templates[selection.row_index as usize]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpl_kernel::filter::{Filter, FilterConfig};
    use vpl_kernel::event::Gender;

    fn column_matcher() -> ColumnMatcher {
        let raw1 = Filter::build(&FilterConfig::Equals {
            field: "person_country_code".to_string(),
            value: serde_json::json!("RAW_1"),
        })
        .unwrap();
        let raw2 = Filter::build(&FilterConfig::Equals {
            field: "person_country_code".to_string(),
            value: serde_json::json!("RAW_2"),
        })
        .unwrap();
        ColumnMatcher::FieldFilters(crate::matcher::FieldFiltersMatcher::build(vec![raw1, raw2]).unwrap())
    }

    fn row_template(gender: Gender) -> LabelerEvent {
        let mut event = LabelerEvent::default();
        event.acting_demo.gender = Some(gender);
        event
    }

    #[test]
    fn s4_column_selection_distribution() {
        // S4: columns RAW_1/RAW_2, rows C1/C2, probabilities [0.8,0.2, 0.2,0.8]
        // row-major (row * num_columns + column).
        let matrix = UpdateMatrixImpl::build(
            column_matcher(),
            2,
            vec![row_template(Gender::Male), row_template(Gender::Female)],
            &[0.8, 0.2, 0.2, 0.8],
            "s4-seed".to_string(),
            false,
        )
        .unwrap();

        let n = 10_000;
        let mut c1_for_raw1 = 0;
        for i in 0..n {
            let mut event = LabelerEvent::default();
            event.person_country_code = Some("RAW_1".to_string());
            event.acting_fingerprint = i;
            matrix.update(&mut event).unwrap();
            if event.acting_demo.gender == Some(Gender::Male) {
                c1_for_raw1 += 1;
            }
        }
        let frac = f64::from(c1_for_raw1) / f64::from(n);
        assert!((0.78..0.82).contains(&frac), "frac = {frac}");
    }

    #[test]
    fn no_match_fails_without_pass_through() {
        let matrix = UpdateMatrixImpl::build(
            column_matcher(),
            2,
            vec![row_template(Gender::Male), row_template(Gender::Female)],
            &[0.5, 0.5, 0.5, 0.5],
            "seed".to_string(),
            false,
        )
        .unwrap();
        let mut event = LabelerEvent::default();
        event.person_country_code = Some("UNMATCHED".to_string());
        assert!(matrix.update(&mut event).is_err());
    }

    #[test]
    fn no_match_passes_through_when_configured() {
        let matrix = UpdateMatrixImpl::build(
            column_matcher(),
            2,
            vec![row_template(Gender::Male), row_template(Gender::Female)],
            &[0.5, 0.5, 0.5, 0.5],
            "seed".to_string(),
            true,
        )
        .unwrap();
        let mut event = LabelerEvent::default();
        event.person_country_code = Some("UNMATCHED".to_string());
        matrix.update(&mut event).unwrap();
        assert_eq!(event.acting_demo.gender, None);
    }

    #[test]
    fn rejects_mismatched_shape() {
        let err = UpdateMatrixImpl::build(
            column_matcher(),
            2,
            vec![row_template(Gender::Male)],
            &[0.5, 0.5],
            "seed".to_string(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, LabelerError::InvalidArgument(_)));
    }
}
