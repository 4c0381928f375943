//! FarmHash Fingerprint64: the one external, non-cryptographic hash every
//! hashing primitive in this crate is built on.
//!
//! Treated as a pure function `fingerprint64(bytes) -> u64`, per the
//! specification's "out of scope, external collaborator" framing; backed
//! here by the `farmhash` crate rather than a hand-rolled reimplementation.

/// Fingerprint arbitrary bytes to a 64-bit value.
#[must_use]
pub fn fingerprint64(bytes: &[u8]) -> u64 {
    farmhash::fingerprint64(bytes)
}

/// Fingerprint a UTF-8 string. Convenience wrapper; many call sites build a
/// seed string before fingerprinting it.
#[must_use]
pub fn fingerprint64_str(s: &str) -> u64 {
    fingerprint64(s.as_bytes())
}

/// Interpret a fingerprint as a float in `[0, 1)` by dividing by `2^64`.
///
/// Used by [`crate::distributed_hash`] and the geometric shredder to turn a
/// hash into a uniform draw.
#[must_use]
pub fn float_hash(seed: &str) -> f64 {
    let h = fingerprint64_str(seed);
    (h as f64) / TWO_POW_64
}

/// `2^64`, computed once as the divisor for [`float_hash`].
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// `-ln(float_hash(seed))`: an exponentially-distributed draw derived from a
/// uniform hash. Used by [`crate::distributed_hash`] and the geometric
/// shredder.
#[must_use]
pub fn exp_hash(seed: &str) -> f64 {
    -float_hash(seed).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_across_calls() {
        let a = fingerprint64_str("hello world");
        let b = fingerprint64_str("hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        assert_ne!(fingerprint64_str("a"), fingerprint64_str("b"));
    }

    #[test]
    fn float_hash_in_unit_interval() {
        for seed in ["x", "y", "z", "consistent-hashing-seed-0"] {
            let h = float_hash(seed);
            assert!((0.0..1.0).contains(&h), "float_hash({seed}) = {h}");
        }
    }

    #[test]
    fn exp_hash_is_non_negative() {
        for seed in ["a", "b", "c"] {
            assert!(exp_hash(seed) >= 0.0);
        }
    }
}
