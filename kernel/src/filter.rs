//! A minimal, real field-filter predicate engine.
//!
//! The specification treats the field-filter engine as an external
//! collaborator consumed only through a `matches(event) -> bool` /
//! `build(record_template) -> Filter` trait boundary. This module is a
//! deliberately small, closed stand-in sufficient to drive every
//! filter-based scenario named in the specification (`Equals`, `IsSet`,
//! conjunctions of both) rather than a reimplementation of the fuller
//! external engine.

use serde::{Deserialize, Serialize};

use crate::error::{LabelerError, LabelerResult};
use crate::event::{Gender, LabelerEvent};
use crate::field_path::{FieldKind, FieldPath, FieldValue};

/// The JSON-facing configuration for a filter, with string field paths not
/// yet resolved against the schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterConfig {
    /// `field` resolves and its value equals `value`.
    Equals {
        field: String,
        value: serde_json::Value,
    },
    /// `field` resolves to anything at all.
    IsSet { field: String },
    /// Every sub-filter matches.
    And { filters: Vec<FilterConfig> },
}

/// A built filter: field paths resolved, values kind-checked.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equals { path: FieldPath, value: FieldValue },
    IsSet { path: FieldPath },
    And(Vec<Filter>),
}

impl Filter {
    /// Resolve a [`FilterConfig`] into a [`Filter`], validating field paths
    /// and value/kind agreement.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if a field path is unknown
    /// or a literal value's type does not match the resolved field's kind.
    pub fn build(config: &FilterConfig) -> LabelerResult<Self> {
        match config {
            FilterConfig::Equals { field, value } => {
                let path = FieldPath::parse(field)?;
                let value = value_for_kind(path.kind(), value)?;
                Ok(Self::Equals { path, value })
            }
            FilterConfig::IsSet { field } => {
                let path = FieldPath::parse(field)?;
                Ok(Self::IsSet { path })
            }
            FilterConfig::And { filters } => {
                if filters.is_empty() {
                    return Err(LabelerError::InvalidArgument(
                        "and-filter requires at least one sub-filter".to_string(),
                    ));
                }
                let built = filters
                    .iter()
                    .map(Filter::build)
                    .collect::<LabelerResult<Vec<_>>>()?;
                Ok(Self::And(built))
            }
        }
    }

    /// Does `event` satisfy this filter?
    #[must_use]
    pub fn matches(&self, event: &LabelerEvent) -> bool {
        match self {
            Self::Equals { path, value } => path.get(event).as_ref() == Some(value),
            Self::IsSet { path } => path.get(event).is_some(),
            Self::And(filters) => filters.iter().all(|f| f.matches(event)),
        }
    }
}

fn value_for_kind(kind: FieldKind, value: &serde_json::Value) -> LabelerResult<FieldValue> {
    match kind {
        FieldKind::I32 => value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(FieldValue::I32)
            .ok_or_else(|| invalid(kind, value)),
        FieldKind::U64 => value
            .as_u64()
            .map(FieldValue::U64)
            .ok_or_else(|| invalid(kind, value)),
        FieldKind::F64 => value
            .as_f64()
            .map(FieldValue::F64)
            .ok_or_else(|| invalid(kind, value)),
        FieldKind::String => value
            .as_str()
            .map(|s| FieldValue::String(s.to_string()))
            .ok_or_else(|| invalid(kind, value)),
        FieldKind::Gender => serde_json::from_value::<Gender>(value.clone())
            .map(FieldValue::Gender)
            .map_err(|_| invalid(kind, value)),
    }
}

fn invalid(kind: FieldKind, value: &serde_json::Value) -> LabelerError {
    LabelerError::InvalidArgument(format!("value {value} does not match field kind {kind:?}"))
}
