//! retrofx synthesizer
//!
//! Procedural generation of retro game sound effects: pickups, lasers,
//! explosions, power-ups, hits, jumps, and UI blips, in the classic
//! oversampled-oscillator style.
//!
//! Generation is deterministic: the same category, seed, and overlay always
//! produce the same samples on every platform, because all randomness flows
//! through a seeded PCG32 and the synthesis runs in plain `f32`.
//!
//! The easiest entry point is [`Synth`]:
//!
//! ```
//! use retrofx_synth::{EffectKind, Synth};
//!
//! let mut synth = Synth::new();
//! let clip = synth.generate_random(EffectKind::Pickup, 12345, None)?;
//! assert!(!clip.samples.is_empty());
//! # Ok::<(), retrofx_synth::SynthError>(())
//! ```

pub mod engine;
pub mod error;
pub mod generate;
pub mod pink;
pub mod rng;
pub mod templates;
pub mod wave;

pub use engine::Generator;
pub use error::{SynthError, SynthResult};
pub use generate::{ClipResult, Synth, DEFAULT_BIT_DEPTH, DEFAULT_SAMPLE_RATE, NUM_CHANNELS};
pub use wave::Waveform;

pub use retrofx_params::{EffectKind, EffectParams, Param, ParamError, ParameterSet};
