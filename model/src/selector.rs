//! `VirtualPersonSelector`: maps a seed to a concrete virtual-person id
//! drawn from a set of id pools.

use vpl_kernel::error::{LabelerError, LabelerResult};
use vpl_kernel::jump_hash::jump_consistent_hash;

/// One configured pool of virtual-person ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool {
    pub id_offset: i64,
    pub total_population: u64,
}

/// A pool after build: its id offset plus where it starts in the logical
/// `[0, total_population)` index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CompiledPool {
    id_offset: i64,
    population_index_offset: u64,
}

/// Built from a population node's pools; turns a 64-bit seed into a
/// concrete virtual-person id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualPersonSelector {
    pools: Vec<CompiledPool>,
    total_population: u64,
}

impl VirtualPersonSelector {
    /// Build a selector from pools, skipping any pool with zero population.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if the total population
    /// across all kept pools is zero.
    pub fn build(pools: &[Pool]) -> LabelerResult<Self> {
        let mut compiled = Vec::new();
        let mut running_total = 0u64;
        for pool in pools {
            if pool.total_population == 0 {
                continue;
            }
            compiled.push(CompiledPool {
                id_offset: pool.id_offset,
                population_index_offset: running_total,
            });
            running_total += pool.total_population;
        }
        if running_total == 0 {
            return Err(LabelerError::InvalidArgument(
                "virtual person selector has zero total population".to_string(),
            ));
        }
        Ok(Self {
            pools: compiled,
            total_population: running_total,
        })
    }

    /// Map `seed` to a virtual-person id.
    ///
    /// # Panics
    ///
    /// Panics if `total_population` exceeds `i32::MAX`; build-time input is
    /// expected to stay within that range, matching `JumpConsistentHash`'s
    /// bucket-count type.
    #[must_use]
    pub fn get_virtual_person_id(&self, seed: u64) -> i64 {
        let num_buckets = i32::try_from(self.total_population)
            .expect("total_population must fit in i32 for jump_consistent_hash");
        let population_index = u64::from(
            u32::try_from(jump_consistent_hash(seed, num_buckets)).expect("non-negative bucket"),
        );

        // Last pool whose population_index_offset <= population_index.
        let pool = self
            .pools
            .iter()
            .rev()
            .find(|p| p.population_index_offset <= population_index)
            .expect("jump_consistent_hash result is within total_population");

        pool.id_offset + (population_index - pool.population_index_offset) as i64
    }
}
