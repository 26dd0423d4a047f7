//! High-level clip generation facade.
//!
//! [`Synth`] ties the pieces together: it seeds the RNG, runs the category
//! template, applies the caller's overlay on top, and renders the clip into
//! a [`ClipResult`] carrying the samples plus everything needed to
//! reproduce them (the seed actually used and a snapshot of the effective
//! parameters).

use rand_pcg::Pcg32;
use retrofx_params::{EffectKind, EffectParams, ParameterSet};

use crate::engine::Generator;
use crate::error::SynthResult;
use crate::rng::{auto_seed, create_rng};
use crate::templates;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
/// Default output bit depth for downstream encoders.
pub const DEFAULT_BIT_DEPTH: u32 = 16;
/// Clips are mono.
pub const NUM_CHANNELS: u32 = 1;

/// A rendered clip plus the inputs needed to regenerate it.
#[derive(Debug, Clone)]
pub struct ClipResult {
    /// Mono PCM samples in [-1, 1].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channel count, always 1.
    pub channels: u32,
    /// The seed actually used; recorded so a seed-0 request can be
    /// replayed.
    pub seed: i32,
    /// Category the clip was generated from.
    pub kind: EffectKind,
    /// Effective parameters after template, overlay, and engine clamping.
    pub params: EffectParams,
}

/// Sound-effect synthesizer facade.
pub struct Synth {
    sample_rate: u32,
    bit_depth: u32,
    engine: Generator,
}

impl Default for Synth {
    fn default() -> Self {
        Self::new()
    }
}

impl Synth {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bit_depth: DEFAULT_BIT_DEPTH,
            engine: Generator::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Sets the output sample rate; validated at render time.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
    }

    pub fn bit_depth(&self) -> u32 {
        self.bit_depth
    }

    /// Sets the output bit depth; validated at render time.
    pub fn set_bit_depth(&mut self, bit_depth: u32) {
        self.bit_depth = bit_depth;
    }

    /// Direct access to the parameter slots, for pinning values and locks
    /// ahead of a randomized generation.
    pub fn params_mut(&mut self) -> &mut ParameterSet {
        self.engine.params_mut()
    }

    /// Generates a randomized clip for `kind`.
    ///
    /// A seed of 0 means "pick one"; the drawn seed is recorded in the
    /// result. Any fields set in `overlay` are applied after the template,
    /// so they win over both the template draw and slot locks.
    pub fn generate_random(
        &mut self,
        kind: EffectKind,
        seed: i32,
        overlay: Option<&EffectParams>,
    ) -> SynthResult<ClipResult> {
        let seed = if seed == 0 { auto_seed() } else { seed };
        let mut rng = create_rng(seed as u32);

        let set = self.engine.params_mut();
        match kind {
            EffectKind::Pickup => templates::pickup_coin(set, &mut rng),
            EffectKind::Laser => templates::laser_shoot(set, &mut rng),
            EffectKind::Explosion => templates::explosion(set, &mut rng),
            EffectKind::PowerUp => templates::power_up(set, &mut rng),
            EffectKind::Hit => templates::hit_hurt(set, &mut rng),
            EffectKind::Jump => templates::jump(set, &mut rng),
            EffectKind::Blip => templates::blip_select(set, &mut rng),
            EffectKind::None => templates::randomize(set, &mut rng),
        }

        if let Some(overlay) = overlay {
            overlay.apply_to(self.engine.params_mut());
        }

        self.render(kind, seed, &mut rng)
    }

    /// Renders a clip from an explicit parameter record with a random
    /// seed. Unset fields fall back to slot defaults.
    pub fn generate(&mut self, params: &EffectParams) -> SynthResult<ClipResult> {
        self.generate_with_seed(params, 0)
    }

    /// Renders a clip from an explicit parameter record. The seed only
    /// matters for noise-based wave shapes; everything else is fully
    /// determined by the record.
    pub fn generate_with_seed(
        &mut self,
        params: &EffectParams,
        seed: i32,
    ) -> SynthResult<ClipResult> {
        let seed = if seed == 0 { auto_seed() } else { seed };
        let mut rng = create_rng(seed as u32);

        // Start from defaults so fields left unset in the record do not
        // inherit values from a previous generation.
        self.engine.params_mut().reset_all(None, false);
        params.apply_to(self.engine.params_mut());

        self.render(EffectKind::None, seed, &mut rng)
    }

    fn render(&mut self, kind: EffectKind, seed: i32, rng: &mut Pcg32) -> SynthResult<ClipResult> {
        self.engine.reset(true, rng);

        let num_samples = self.engine.sample_count();
        let mut samples = vec![0.0f32; num_samples];
        self.engine
            .generate(&mut samples, num_samples, self.sample_rate, self.bit_depth, rng)?;

        // Snapshot after rendering so engine write-backs (length floors)
        // are reflected.
        let params = EffectParams::from_set(self.engine.params());

        Ok(ClipResult {
            samples,
            sample_rate: self.sample_rate,
            channels: NUM_CHANNELS,
            seed,
            kind,
            params,
        })
    }
}
