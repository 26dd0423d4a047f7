//! Deterministic RNG construction using PCG32.
//!
//! All randomness in the synthesizer flows through an explicitly injected
//! PCG32 handle, so a given (category, seed, overlay) request is fully
//! reproducible. Nothing here touches process-global state except
//! [`auto_seed`], which exists precisely to pick a fresh seed for callers
//! that did not supply one.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    // Expand 32-bit seed to 64-bit for PCG32 state
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Draws a fresh positive seed from the thread RNG.
///
/// Used when a caller passes seed 0 ("pick one for me"); the returned seed
/// is recorded in the clip result so the sound can be regenerated.
pub fn auto_seed() -> i32 {
    rand::thread_rng().gen_range(1..=i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);

        let values1: Vec<f32> = (0..100).map(|_| rng1.gen()).collect();
        let values2: Vec<f32> = (0..100).map(|_| rng2.gen()).collect();

        assert_eq!(values1, values2);
    }

    #[test]
    fn test_different_seeds_produce_different_sequences() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(43);

        let values1: Vec<f32> = (0..10).map(|_| rng1.gen()).collect();
        let values2: Vec<f32> = (0..10).map(|_| rng2.gen()).collect();

        assert_ne!(values1, values2);
    }

    #[test]
    fn test_auto_seed_is_positive() {
        for _ in 0..32 {
            assert!(auto_seed() > 0);
        }
    }
}
