//! `AttributesUpdater` polymorphism: tagged dispatch over the six updater
//! variants a branch node may run before selecting its child.

use serde::{Deserialize, Serialize};

use vpl_kernel::error::{LabelerError, LabelerResult};
use vpl_kernel::event::LabelerEvent;
use vpl_kernel::field_path::FieldPath;
use vpl_kernel::filter::{Filter, FilterConfig};

use crate::conditional_assignment::{Assignment, ConditionalAssignmentImpl};
use crate::conditional_merge::ConditionalMergeImpl;
use crate::geometric_shredder::GeometricShredderImpl;
use crate::matcher::{ColumnMatcher, FieldFiltersMatcher, HashFieldMaskMatcher};
use crate::multiplicity::{ExpectedMultiplicity, MultiplicityImpl};
use crate::node::{build_node, CompiledNodeConfig, ModelNode};
use crate::sparse_update_matrix::{SparseColumn, SparseUpdateMatrixImpl};
use crate::update_matrix::UpdateMatrixImpl;

use std::collections::BTreeMap;

/// JSON-facing configuration for a column matcher shared by the three
/// matrix-style updaters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnMatcherConfig {
    FieldFilters { filters: Vec<FilterConfig> },
    HashFieldMask {
        templates: Vec<LabelerEvent>,
        field_mask: Vec<String>,
    },
}

fn build_column_matcher(config: &ColumnMatcherConfig) -> LabelerResult<ColumnMatcher> {
    match config {
        ColumnMatcherConfig::FieldFilters { filters } => {
            let built = filters
                .iter()
                .map(Filter::build)
                .collect::<LabelerResult<Vec<_>>>()?;
            Ok(ColumnMatcher::FieldFilters(FieldFiltersMatcher::build(
                built,
            )?))
        }
        ColumnMatcherConfig::HashFieldMask {
            templates,
            field_mask,
        } => {
            let paths = field_mask
                .iter()
                .map(|p| FieldPath::parse(p))
                .collect::<LabelerResult<Vec<_>>>()?;
            Ok(ColumnMatcher::HashFieldMask(HashFieldMaskMatcher::build(
                templates, paths,
            )?))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparseColumnConfig {
    pub row_templates: Vec<LabelerEvent>,
    pub probabilities: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionalMergeBranchConfig {
    pub condition: FilterConfig,
    pub update: LabelerEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentConfig {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExpectedMultiplicityConfig {
    Constant(f64),
    Field(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiplicityConfig {
    pub expected_multiplicity: ExpectedMultiplicityConfig,
    pub max_value: f64,
    pub cap_at_max: bool,
    pub person_index_field: String,
    pub random_seed: String,
}

/// JSON-facing configuration for one of the six updater variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum UpdaterConfig {
    UpdateMatrix {
        column_matcher: ColumnMatcherConfig,
        num_columns: usize,
        row_templates: Vec<LabelerEvent>,
        probabilities: Vec<f64>,
        random_seed: String,
        pass_through_non_matches: bool,
    },
    SparseUpdateMatrix {
        column_matcher: ColumnMatcherConfig,
        columns: Vec<SparseColumnConfig>,
        random_seed: String,
        pass_through_non_matches: bool,
    },
    ConditionalMerge {
        branches: Vec<ConditionalMergeBranchConfig>,
        pass_through_non_matches: bool,
    },
    ConditionalAssignment {
        condition: FilterConfig,
        assignments: Vec<AssignmentConfig>,
    },
    UpdateTree {
        root: Box<CompiledNodeConfig>,
    },
    GeometricShredder {
        psi: f64,
        randomness_field: String,
        target_field: String,
        random_seed: String,
    },
}

/// A built updater: exactly the dispatch the specification's "tagged
/// variant, not trait objects" design note calls for.
pub enum AttributesUpdater {
    UpdateMatrix(UpdateMatrixImpl),
    SparseUpdateMatrix(SparseUpdateMatrixImpl),
    ConditionalMerge(ConditionalMergeImpl),
    ConditionalAssignment(ConditionalAssignmentImpl),
    UpdateTree(Box<ModelNode>),
    GeometricShredder(GeometricShredderImpl),
}

impl AttributesUpdater {
    /// Build an updater from its configuration.
    ///
    /// # Errors
    ///
    /// Propagates the underlying variant's build error.
    pub fn build(config: UpdaterConfig) -> LabelerResult<Self> {
        match config {
            UpdaterConfig::UpdateMatrix {
                column_matcher,
                num_columns,
                row_templates,
                probabilities,
                random_seed,
                pass_through_non_matches,
            } => {
                let matcher = build_column_matcher(&column_matcher)?;
                Ok(Self::UpdateMatrix(UpdateMatrixImpl::build(
                    matcher,
                    num_columns,
                    row_templates,
                    &probabilities,
                    random_seed,
                    pass_through_non_matches,
                )?))
            }
            UpdaterConfig::SparseUpdateMatrix {
                column_matcher,
                columns,
                random_seed,
                pass_through_non_matches,
            } => {
                let matcher = build_column_matcher(&column_matcher)?;
                let columns = columns
                    .into_iter()
                    .map(|c| SparseColumn {
                        row_templates: c.row_templates,
                        probabilities: c.probabilities,
                    })
                    .collect();
                Ok(Self::SparseUpdateMatrix(SparseUpdateMatrixImpl::build(
                    matcher,
                    columns,
                    random_seed,
                    pass_through_non_matches,
                )?))
            }
            UpdaterConfig::ConditionalMerge {
                branches,
                pass_through_non_matches,
            } => {
                let pairs = branches
                    .into_iter()
                    .map(|b| Ok((Filter::build(&b.condition)?, b.update)))
                    .collect::<LabelerResult<Vec<_>>>()?;
                Ok(Self::ConditionalMerge(ConditionalMergeImpl::build(
                    pairs,
                    pass_through_non_matches,
                )?))
            }
            UpdaterConfig::ConditionalAssignment {
                condition,
                assignments,
            } => {
                let condition = Filter::build(&condition)?;
                let assignments = assignments
                    .into_iter()
                    .map(|a| {
                        Ok(Assignment {
                            source: FieldPath::parse(&a.source)?,
                            target: FieldPath::parse(&a.target)?,
                        })
                    })
                    .collect::<LabelerResult<Vec<_>>>()?;
                Ok(Self::ConditionalAssignment(ConditionalAssignmentImpl::build(
                    condition,
                    assignments,
                )?))
            }
            UpdaterConfig::UpdateTree { root } => {
                let mut pending = BTreeMap::new();
                let root = build_node(*root, &mut pending)?;
                Ok(Self::UpdateTree(Box::new(root)))
            }
            UpdaterConfig::GeometricShredder {
                psi,
                randomness_field,
                target_field,
                random_seed,
            } => Ok(Self::GeometricShredder(GeometricShredderImpl::build(
                psi,
                FieldPath::parse(&randomness_field)?,
                FieldPath::parse(&target_field)?,
                random_seed,
            )?)),
        }
    }

    /// Run this updater against `event`.
    ///
    /// # Errors
    ///
    /// Propagates the underlying variant's apply-time error.
    pub fn apply(&self, event: &mut LabelerEvent) -> LabelerResult<()> {
        match self {
            Self::UpdateMatrix(u) => u.update(event),
            Self::SparseUpdateMatrix(u) => u.update(event),
            Self::ConditionalMerge(u) => u.update(event),
            Self::ConditionalAssignment(u) => {
                u.update(event);
                Ok(())
            }
            Self::UpdateTree(root) => root.apply(event),
            Self::GeometricShredder(u) => u.update(event),
        }
    }
}

pub fn build_multiplicity(config: MultiplicityConfig) -> LabelerResult<MultiplicityImpl> {
    let expected = match config.expected_multiplicity {
        ExpectedMultiplicityConfig::Constant(v) => ExpectedMultiplicity::Constant(v),
        ExpectedMultiplicityConfig::Field(field) => {
            ExpectedMultiplicity::Field(FieldPath::parse(&field)?)
        }
    };
    let person_index_field = FieldPath::parse(&config.person_index_field)?;
    MultiplicityImpl::build(
        expected,
        config.max_value,
        config.cap_at_max,
        person_index_field,
        config.random_seed,
    )
}
