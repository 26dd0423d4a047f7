//! Pink noise source.
//!
//! Voss-McCartney style generator: a bank of white-noise accumulators where
//! accumulator `i` is re-rolled every 2^i steps, so the low bands update
//! slowly and the summed spectrum falls off at roughly 3 dB per octave.

use rand::Rng;
use rand_pcg::Pcg32;

const NUM_BANDS: usize = 5;
const MAX_KEY: u32 = 0x1f;
const RANGE: f32 = 128.0;

/// Incremental pink-noise state.
///
/// All draws go through the injected RNG so the stream is reproducible for
/// a given seed. A fresh source is built at the start of every clip.
#[derive(Debug, Clone, Default)]
pub struct PinkNoise {
    white_values: [u32; NUM_BANDS],
    key: u32,
}

impl PinkNoise {
    pub fn new(rng: &mut Pcg32) -> Self {
        let mut white_values = [0u32; NUM_BANDS];
        for value in white_values.iter_mut() {
            *value = (rng.gen::<f32>() * (RANGE / NUM_BANDS as f32)) as u32;
        }
        Self {
            white_values,
            key: 0,
        }
    }

    /// Returns the next pink-noise value in [-1, 1].
    pub fn next_value(&mut self, rng: &mut Pcg32) -> f32 {
        let last_key = self.key;
        self.key += 1;
        if self.key > MAX_KEY {
            self.key = 0;
        }

        // Bits that changed in the counter select which bands re-roll.
        let diff = last_key ^ self.key;
        let mut sum = 0u32;
        for (i, value) in self.white_values.iter_mut().enumerate() {
            if diff & (1 << i) != 0 {
                *value = (rng.gen::<f32>() * (RANGE / NUM_BANDS as f32)) as u32;
            }
            sum += *value;
        }

        sum as f32 / 64.0 - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn test_values_stay_in_range() {
        let mut rng = create_rng(7);
        let mut pink = PinkNoise::new(&mut rng);
        for _ in 0..4096 {
            let value = pink.next_value(&mut rng);
            assert!((-1.0..=1.0).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn test_stream_is_deterministic() {
        let mut rng1 = create_rng(99);
        let mut pink1 = PinkNoise::new(&mut rng1);
        let mut rng2 = create_rng(99);
        let mut pink2 = PinkNoise::new(&mut rng2);

        for _ in 0..256 {
            assert_eq!(pink1.next_value(&mut rng1), pink2.next_value(&mut rng2));
        }
    }
}
