//! `SparseUpdateMatrixImpl`: like [`crate::update_matrix::UpdateMatrixImpl`]
//! but stored column-major, with each column carrying only its own
//! non-zero-probability rows.

use vpl_kernel::distributed_hash::{DistributedConsistentHashing, WeightedChoice};
use vpl_kernel::error::{LabelerError, LabelerResult};
use vpl_kernel::event::LabelerEvent;

use crate::matcher::{ColumnMatcher, NO_MATCH};
use crate::update_matrix::select_from_matrix;

/// One sparse column: its own row templates and per-row probabilities.
pub struct SparseColumn {
    pub row_templates: Vec<LabelerEvent>,
    pub probabilities: Vec<f64>,
}

pub struct SparseUpdateMatrixImpl {
    column_matcher: ColumnMatcher,
    row_hashings: Vec<DistributedConsistentHashing>,
    rows: Vec<Vec<LabelerEvent>>,
    random_seed: String,
    pass_through_non_matches: bool,
}

impl SparseUpdateMatrixImpl {
    /// Build a sparse update matrix from one [`SparseColumn`] per column.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if `columns` is empty, any
    /// column has no rows, or a column's `row_templates.len() !=
    /// probabilities.len()`.
    pub fn build(
        column_matcher: ColumnMatcher,
        columns: Vec<SparseColumn>,
        random_seed: String,
        pass_through_non_matches: bool,
    ) -> LabelerResult<Self> {
        if columns.is_empty() {
            return Err(LabelerError::InvalidArgument(
                "sparse update matrix requires at least one column".to_string(),
            ));
        }

        let mut row_hashings = Vec::with_capacity(columns.len());
        let mut rows = Vec::with_capacity(columns.len());
        for (index, column) in columns.into_iter().enumerate() {
            if column.row_templates.is_empty() {
                return Err(LabelerError::InvalidArgument(format!(
                    "sparse update matrix column {index} has no rows"
                )));
            }
            if column.row_templates.len() != column.probabilities.len() {
                return Err(LabelerError::InvalidArgument(format!(
                    "sparse update matrix column {index} has {} rows but {} probabilities",
                    column.row_templates.len(),
                    column.probabilities.len()
                )));
            }

            let choices = column
                .probabilities
                .iter()
                .enumerate()
                .map(|(row, &probability)| WeightedChoice {
                    choice_id: row as i32,
                    probability,
                })
                .collect();
            row_hashings.push(DistributedConsistentHashing::build(choices)?);
            rows.push(column.row_templates);
        }

        Ok(Self {
            column_matcher,
            row_hashings,
            rows,
            random_seed,
            pass_through_non_matches,
        })
    }

    /// Apply the matrix to `event`.
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
                    "sparse update matrix: no column matched the event".to_string(),
                ))
            };
        }

        let column = &self.rows[selection.column_index as usize];
        event.merge_from(&column[selection.row_index as usize]);
        Ok(())
    }
}
