//! `DistributedConsistentHashing`: exponentially-weighted minimum hashing.
//!
//! Given a finite distribution over choice ids, [`DistributedConsistentHashing::hash`]
//! deterministically picks exactly one choice for a given seed string, such
//! that the empirical frequency of each choice tracks its probability and
//! small changes to the distribution cause minimal remapping.

use crate::error::{LabelerError, LabelerResult};
use crate::fingerprint::float_hash;

/// Allowed slack when validating that probabilities sum to 1.
const NORMALIZE_ERROR: f64 = 0.01;

/// A single weighted choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedChoice {
    pub choice_id: i32,
    pub probability: f64,
}

/// A built, normalized distribution ready to be hashed against seeds.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributedConsistentHashing {
    choices: Vec<WeightedChoice>,
}

impl DistributedConsistentHashing {
    /// Validate and normalize a distribution.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if `choices` is empty, any
    /// probability is negative, or the probabilities do not sum to 1 within
    /// `±1%`.
    pub fn build(choices: Vec<WeightedChoice>) -> LabelerResult<Self> {
        if choices.is_empty() {
            return Err(LabelerError::InvalidArgument(
                "distributed consistent hashing requires at least one choice".to_string(),
            ));
        }
        let mut sum = 0.0;
        for choice in &choices {
            if choice.probability < 0.0 {
                return Err(LabelerError::InvalidArgument(format!(
                    "choice {} has negative probability {}",
                    choice.choice_id, choice.probability
                )));
            }
            sum += choice.probability;
        }
        if !(1.0 - NORMALIZE_ERROR..=1.0 + NORMALIZE_ERROR).contains(&sum) {
            return Err(LabelerError::InvalidArgument(format!(
                "probabilities sum to {sum}, which is not within {NORMALIZE_ERROR} of 1.0"
            )));
        }

        let normalized = choices
            .into_iter()
            .map(|c| WeightedChoice {
                choice_id: c.choice_id,
                probability: c.probability / sum,
            })
            .collect();

        Ok(Self { choices: normalized })
    }

    /// Pick the choice id minimizing `xi_i = -ln(float_hash(seed)) / p_i`.
    ///
    /// Zero-probability choices have `xi = +infinity` and are never chosen.
    /// Ties (vanishingly unlikely with real fingerprints) keep the earliest
    /// choice in build order.
    #[must_use]
    pub fn hash(&self, seed: &str) -> i32 {
        let mut best_choice = self.choices[0].choice_id;
        let mut best_xi = f64::INFINITY;

        for choice in &self.choices {
            let full_seed = format!("consistent-hashing-{seed}-{}", choice.choice_id);
            let xi = if choice.probability == 0.0 {
                f64::INFINITY
            } else {
                -float_hash(&full_seed).ln() / choice.probability
            };
            if xi < best_xi {
                best_xi = xi;
                best_choice = choice.choice_id;
            }
        }

        best_choice
    }
}
