//! Hashing behind [`crate::WeightedSelector::select_keyed`].
//!
//! A request key is hashed together with the selector seed and the tag, and the hash
//! is read as a draw on `[0, 1)`. Keyed routing therefore needs no per-key state and
//! agrees across processes that share a seed. None of this is cryptographic.

const FNV_OFFSET: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// Hash `s` under `seed`; identical inputs give identical output on every platform.
#[must_use]
pub fn stable_hash64(seed: u64, s: &str) -> u64 {
    mix64(seed ^ fnv1a64(s.as_bytes()))
}

/// Read the top 53 bits of `h` as a uniform draw on `[0, 1)`.
#[must_use]
pub fn unit_interval(h: u64) -> f64 {
    (h >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |h, &b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

// SplitMix64 finalizer: FNV alone leaves the high bits poorly mixed for short keys,
// and `unit_interval` reads exactly those.
#[inline]
fn mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unit_interval_edges() {
        assert_eq!(unit_interval(0), 0.0);
        assert!(unit_interval(u64::MAX) < 1.0);
    }

    #[test]
    fn fnv_matches_reference_vectors() {
        assert_eq!(fnv1a64(b""), 0xCBF2_9CE4_8422_2325);
        assert_eq!(fnv1a64(b"a"), 0xAF63_DC4C_8601_EC8C);
    }

    #[test]
    fn seed_changes_the_hash() {
        assert_ne!(stable_hash64(1, "req-1"), stable_hash64(2, "req-1"));
        assert_eq!(stable_hash64(1, "req-1"), stable_hash64(1, "req-1"));
    }

    proptest! {
        #[test]
        fn unit_interval_is_in_range(seed in any::<u64>(), key in ".{0,32}") {
            let u = unit_interval(stable_hash64(seed, &key));
            prop_assert!((0.0..1.0).contains(&u));
        }
    }
}
