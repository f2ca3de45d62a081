//! Seeded pseudo-random number generator
//!
//! Deterministic PRNG for reproducible match execution: the same seed and
//! match index always yield the same stream, so a tournament can be
//! replayed exactly (and its matches run on any thread in any order).

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::Action;

/// Seeded random number generator
///
/// Deterministic: same seed + index = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    /// Create a new RNG from a 32-byte seed and match index
    pub fn new(seed: &[u8; 32], match_index: u32) -> Self {
        let mut mixed = *seed;
        let salt = (match_index as u64).wrapping_mul(0x517cc1b727220a95);
        for (byte, salt_byte) in mixed.iter_mut().zip(salt.to_le_bytes()) {
            *byte ^= salt_byte;
        }
        // Keep index 0 distinct from the raw seed stream
        mixed[31] ^= 0xA5;
        Self { inner: StdRng::from_seed(mixed) }
    }

    pub fn from_u64(seed: u64) -> Self {
        Self { inner: StdRng::seed_from_u64(seed) }
    }

    /// Unseeded generator, reproducible only in distribution
    pub fn from_entropy() -> Self {
        Self { inner: StdRng::from_os_rng() }
    }

    /// Generate a value in `[0, 1)`
    pub fn next_unit(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// Generate a value in range `[0, max)`
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.inner.random_range(0..max)
    }

    /// Uniform action in `0..count`
    pub fn next_action(&mut self, count: u8) -> Action {
        self.next_range(count as u32) as Action
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }
}

/// Stretch a short user-facing seed into a 32-byte tournament seed
pub fn expand_seed(seed: u64) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    StdRng::seed_from_u64(seed).fill_bytes(&mut bytes);
    bytes
}

/// Fresh tournament seed from OS entropy
pub fn random_seed() -> [u8; 32] {
    rand::random()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let seed = [42u8; 32];
        let mut r1 = SeededRng::new(&seed, 0);
        let mut r2 = SeededRng::new(&seed, 0);

        for _ in 0..100 {
            assert_eq!(r1.next_u64(), r2.next_u64());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = SeededRng::new(&[1u8; 32], 0);
        let mut rng2 = SeededRng::new(&[2u8; 32], 0);

        let vals1: Vec<_> = (0..10).map(|_| rng1.next_u64()).collect();
        let vals2: Vec<_> = (0..10).map(|_| rng2.next_u64()).collect();

        assert_ne!(vals1, vals2);
    }

    #[test]
    fn test_different_match_index() {
        let seed = [42u8; 32];
        let mut rng1 = SeededRng::new(&seed, 0);
        let mut rng2 = SeededRng::new(&seed, 1);

        let vals1: Vec<_> = (0..4).map(|_| rng1.next_u64()).collect();
        let vals2: Vec<_> = (0..4).map(|_| rng2.next_u64()).collect();
        assert_ne!(vals1, vals2);
    }

    #[test]
    fn test_unit_range() {
        let mut rng = SeededRng::new(&[42u8; 32], 0);
        for _ in 0..1000 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_next_range() {
        let mut rng = SeededRng::new(&[42u8; 32], 0);

        for max in [1, 10, 100, 1000].iter() {
            for _ in 0..100 {
                let val = rng.next_range(*max);
                assert!(val < *max, "next_range({}) returned {}", max, val);
            }
        }

        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_next_action_covers_range() {
        let mut rng = SeededRng::from_u64(7);
        let mut seen = [false; 6];
        for _ in 0..500 {
            seen[rng.next_action(6) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "not every action drawn: {:?}", seen);
    }

    #[test]
    fn test_expand_seed_is_stable() {
        assert_eq!(expand_seed(9), expand_seed(9));
        assert_ne!(expand_seed(9), expand_seed(10));
    }
}
