//! `FieldFiltersMatcher` and `HashFieldMaskMatcher`: the two ways a matrix
//! or branch selects a column/branch by condition instead of by chance.
//!
//! Both return the matched index, or [`NO_MATCH`] — a sentinel distinct
//! from any valid index.

use std::collections::BTreeMap;

use vpl_kernel::canon::canonical_json_bytes;
use vpl_kernel::error::{LabelerError, LabelerResult};
use vpl_kernel::event::LabelerEvent;
use vpl_kernel::field_path::{FieldPath, FieldValue};
use vpl_kernel::filter::Filter;
use vpl_kernel::fingerprint::fingerprint64;

/// Sentinel returned by both matchers when no index matches.
pub const NO_MATCH: i32 = -1;

/// Linear scan over an ordered list of filters; first match wins.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFiltersMatcher {
    filters: Vec<Filter>,
}

impl FieldFiltersMatcher {
    /// Build from an ordered, non-empty list of filters.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if `filters` is empty.
    pub fn build(filters: Vec<Filter>) -> LabelerResult<Self> {
        if filters.is_empty() {
            return Err(LabelerError::InvalidArgument(
                "field filters matcher requires at least one filter".to_string(),
            ));
        }
        Ok(Self { filters })
    }

    /// Return the index of the first matching filter, or [`NO_MATCH`].
    #[must_use]
    pub fn first_match(&self, event: &LabelerEvent) -> i32 {
        self.filters
            .iter()
            .position(|f| f.matches(event))
            .map_or(NO_MATCH, |i| i as i32)
    }
}

/// Hash-based matcher: at build time, project each column template through
/// a field mask into canonical bytes, fingerprint it, and record the
/// mapping. At match time, project the event identically and look up.
#[derive(Debug, Clone, PartialEq)]
pub struct HashFieldMaskMatcher {
    field_mask: Vec<FieldPath>,
    fingerprint_to_index: BTreeMap<u64, i32>,
}

impl HashFieldMaskMatcher {
    /// Build from column templates and the field mask projecting them.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if `templates` or
    /// `field_mask` is empty, or if two templates project to the same
    /// hash (a build-time collision).
    pub fn build(templates: &[LabelerEvent], field_mask: Vec<FieldPath>) -> LabelerResult<Self> {
        if templates.is_empty() {
            return Err(LabelerError::InvalidArgument(
                "hash field mask matcher requires at least one template".to_string(),
            ));
        }
        if field_mask.is_empty() {
            return Err(LabelerError::InvalidArgument(
                "hash field mask matcher requires a non-empty field mask".to_string(),
            ));
        }

        let mut fingerprint_to_index = BTreeMap::new();
        for (index, template) in templates.iter().enumerate() {
            let hash = project_and_hash(template, &field_mask)?;
            if fingerprint_to_index.insert(hash, index as i32).is_some() {
                return Err(LabelerError::InvalidArgument(format!(
                    "multiple events have the same hash {hash} under the configured field mask"
                )));
            }
        }

        Ok(Self {
            field_mask,
            fingerprint_to_index,
        })
    }

    /// Project `event` through the field mask and look up its index, or
    /// return [`NO_MATCH`].
    ///
    /// # Errors
    ///
    /// Propagates a canonicalization failure from projecting `event`; this
    /// cannot happen for field masks validated at [`Self::build`] time
    /// against the same schema.
    pub fn get_match(&self, event: &LabelerEvent) -> LabelerResult<i32> {
        let hash = project_and_hash(event, &self.field_mask)?;
        Ok(self
            .fingerprint_to_index
            .get(&hash)
            .copied()
            .unwrap_or(NO_MATCH))
    }
}

fn project_and_hash(event: &LabelerEvent, field_mask: &[FieldPath]) -> LabelerResult<u64> {
    let mut object = serde_json::Map::new();
    for (slot, path) in field_mask.iter().enumerate() {
        let value = field_value_to_json(path.get(event));
        object.insert(slot.to_string(), value);
    }
    let bytes = canonical_json_bytes(&serde_json::Value::Object(object)).map_err(|e| {
        LabelerError::Internal(format!("hash field mask projection is not canonicalizable: {e}"))
    })?;
    Ok(fingerprint64(&bytes))
}

fn field_value_to_json(value: Option<FieldValue>) -> serde_json::Value {
    match value {
        None => serde_json::Value::Null,
        Some(FieldValue::I32(v)) => serde_json::json!(v),
        Some(FieldValue::U64(v)) => serde_json::json!(v),
        Some(FieldValue::F64(v)) => serde_json::json!(v),
        Some(FieldValue::String(v)) => serde_json::json!(v),
        Some(FieldValue::Gender(v)) => serde_json::to_value(v).unwrap_or(serde_json::Value::Null),
    }
}

/// Either matcher kind, as consumed by the three matrix-style updaters.
/// `UpdateMatrixImpl::build`/`SparseUpdateMatrixImpl::build` construct
/// exactly one of these per update matrix, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnMatcher {
    FieldFilters(FieldFiltersMatcher),
    HashFieldMask(HashFieldMaskMatcher),
}

impl ColumnMatcher {
    /// Resolve the column index for `event`, or [`NO_MATCH`].
    ///
    /// # Errors
    ///
    /// Propagates [`HashFieldMaskMatcher::get_match`]'s error.
    pub fn match_index(&self, event: &LabelerEvent) -> LabelerResult<i32> {
        match self {
            Self::FieldFilters(matcher) => Ok(matcher.first_match(event)),
            Self::HashFieldMask(matcher) => matcher.get_match(event),
        }
    }
}
