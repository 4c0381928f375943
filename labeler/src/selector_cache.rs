//! A small bounded, day-keyed LRU cache of built [`Labeler`]s.
//!
//! Standing in for the fuller model-selector/rollout scaffolding the
//! original implementation carries around model freshness; this workspace
//! only needs the cache shape, not a rollout-date model-fetch mechanism.

use std::collections::{HashMap, VecDeque};

use vpl_kernel::error::LabelerResult;

use crate::Labeler;

pub struct SelectorCache {
    capacity: usize,
    order: VecDeque<String>,
    entries: HashMap<String, Labeler>,
}

impl SelectorCache {
    /// # Panics
    ///
    /// Panics if `capacity` is zero; a zero-capacity cache can never hold
    /// anything `get_or_load` returns a reference into.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "selector cache capacity must be positive");
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the labeler cached under `day_key`, loading it via `load` on
    /// a miss and evicting the least recently used entry if the cache is
    /// already at capacity.
    ///
    /// # Errors
    ///
    /// Propagates `load`'s error on a miss; an existing entry never
    /// re-invokes `load`.
    pub fn get_or_load<F>(&mut self, day_key: &str, load: F) -> LabelerResult<&Labeler>
    where
        F: FnOnce() -> LabelerResult<Labeler>,
    {
        if self.entries.contains_key(day_key) {
            self.touch(day_key);
        } else {
            if self.entries.len() >= self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
            let labeler = load()?;
            self.entries.insert(day_key.to_string(), labeler);
            self.order.push_back(day_key.to_string());
        }
        Ok(self.entries.get(day_key).expect("just inserted or present"))
    }

    fn touch(&mut self, day_key: &str) {
        self.order.retain(|k| k != day_key);
        self.order.push_back(day_key.to_string());
    }
}
