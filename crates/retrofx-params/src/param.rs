//! Parameter slots, their metadata, and the lockable parameter set.
//!
//! Each slot carries static metadata (label, description, default, inclusive
//! bounds). A [`ParameterSet`] stores one value per slot and clamps every
//! write into the slot's range, so stored values are in-range by
//! construction. Slots can be locked; locked slots are skipped by
//! randomization, templates, and bulk resets, which is how a caller pins a
//! parameter while still requesting a randomized effect.

use crate::error::ParamError;

/// Identifies one of the synthesizer's control parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Shape of the oscillator wave.
    WaveType,
    /// Overall volume of the sound.
    MasterVolume,
    /// Length of the volume envelope attack.
    AttackTime,
    /// Length of the volume envelope sustain.
    SustainTime,
    /// Tilts the sustain envelope for more "pop".
    SustainPunch,
    /// Length of the volume envelope decay.
    DecayTime,
    /// Pushes amplitudes together into a narrower range.
    CompressionAmount,
    /// Base note of the sound.
    StartFrequency,
    /// If sliding, the sound stops at this frequency.
    MinFrequency,
    /// Slides the frequency up or down.
    Slide,
    /// Accelerates the frequency slide.
    DeltaSlide,
    /// Strength of the vibrato effect.
    VibratoDepth,
    /// Speed of the vibrato effect.
    VibratoSpeed,
    /// Number of harmonic copies overlaid on the waveform.
    Overtones,
    /// Decay rate of the higher overtones.
    OvertoneFalloff,
    /// How often the pitch-jump schedules re-arm.
    ChangeRepeat,
    /// First pitch jump, up or down.
    ChangeAmount,
    /// Onset speed of the first pitch jump.
    ChangeSpeed,
    /// Second pitch jump, up or down.
    ChangeAmount2,
    /// Onset speed of the second pitch jump.
    ChangeSpeed2,
    /// Square waveform only: up/down state ratio.
    SquareDuty,
    /// Square waveform only: sweeps the duty up or down.
    DutySweep,
    /// Speed of the note repeat, which partially resets the sound.
    RepeatSpeed,
    /// Phase offset of the flanger's delayed copy.
    FlangerOffset,
    /// Sweeps the flanger phase up or down.
    FlangerSweep,
    /// Low-pass filter cutoff.
    LpFilterCutoff,
    /// Sweeps the low-pass cutoff up or down.
    LpFilterCutoffSweep,
    /// Low-pass filter resonance.
    LpFilterResonance,
    /// High-pass filter cutoff.
    HpFilterCutoff,
    /// Sweeps the high-pass cutoff up or down.
    HpFilterCutoffSweep,
    /// Resamples the audio at a lower frequency (zero-order hold).
    BitCrush,
    /// Sweeps the bit-crush frequency up or down.
    BitCrushSweep,
}

impl Param {
    /// Number of parameter slots.
    pub const COUNT: usize = 32;

    /// Every slot, in declaration order.
    ///
    /// This order is normative: bulk randomization draws values in this
    /// order, so it is part of the seeded-determinism contract.
    pub const ALL: [Param; Param::COUNT] = [
        Param::WaveType,
        Param::MasterVolume,
        Param::AttackTime,
        Param::SustainTime,
        Param::SustainPunch,
        Param::DecayTime,
        Param::CompressionAmount,
        Param::StartFrequency,
        Param::MinFrequency,
        Param::Slide,
        Param::DeltaSlide,
        Param::VibratoDepth,
        Param::VibratoSpeed,
        Param::Overtones,
        Param::OvertoneFalloff,
        Param::ChangeRepeat,
        Param::ChangeAmount,
        Param::ChangeSpeed,
        Param::ChangeAmount2,
        Param::ChangeSpeed2,
        Param::SquareDuty,
        Param::DutySweep,
        Param::RepeatSpeed,
        Param::FlangerOffset,
        Param::FlangerSweep,
        Param::LpFilterCutoff,
        Param::LpFilterCutoffSweep,
        Param::LpFilterResonance,
        Param::HpFilterCutoff,
        Param::HpFilterCutoffSweep,
        Param::BitCrush,
        Param::BitCrushSweep,
    ];

    /// Identifier-style name of the slot, as used by [`Param::from_name`]
    /// and the `EffectParams` debug dump.
    pub fn name(self) -> &'static str {
        match self {
            Param::WaveType => "WaveType",
            Param::MasterVolume => "MasterVolume",
            Param::AttackTime => "AttackTime",
            Param::SustainTime => "SustainTime",
            Param::SustainPunch => "SustainPunch",
            Param::DecayTime => "DecayTime",
            Param::CompressionAmount => "CompressionAmount",
            Param::StartFrequency => "StartFrequency",
            Param::MinFrequency => "MinFrequency",
            Param::Slide => "Slide",
            Param::DeltaSlide => "DeltaSlide",
            Param::VibratoDepth => "VibratoDepth",
            Param::VibratoSpeed => "VibratoSpeed",
            Param::Overtones => "Overtones",
            Param::OvertoneFalloff => "OvertoneFalloff",
            Param::ChangeRepeat => "ChangeRepeat",
            Param::ChangeAmount => "ChangeAmount",
            Param::ChangeSpeed => "ChangeSpeed",
            Param::ChangeAmount2 => "ChangeAmount2",
            Param::ChangeSpeed2 => "ChangeSpeed2",
            Param::SquareDuty => "SquareDuty",
            Param::DutySweep => "DutySweep",
            Param::RepeatSpeed => "RepeatSpeed",
            Param::FlangerOffset => "FlangerOffset",
            Param::FlangerSweep => "FlangerSweep",
            Param::LpFilterCutoff => "LpFilterCutoff",
            Param::LpFilterCutoffSweep => "LpFilterCutoffSweep",
            Param::LpFilterResonance => "LpFilterResonance",
            Param::HpFilterCutoff => "HpFilterCutoff",
            Param::HpFilterCutoffSweep => "HpFilterCutoffSweep",
            Param::BitCrush => "BitCrush",
            Param::BitCrushSweep => "BitCrushSweep",
        }
    }

    /// Resolves a slot from its identifier-style name.
    pub fn from_name(name: &str) -> Result<Param, ParamError> {
        Param::ALL
            .iter()
            .copied()
            .find(|p| p.name() == name)
            .ok_or_else(|| ParamError::UnknownSlot {
                name: name.to_string(),
            })
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Static metadata for a parameter slot.
#[derive(Debug, Clone, Copy)]
pub struct ParamInfo {
    /// Human-readable label for editor surfaces.
    pub label: &'static str,
    /// One-line description of the slot's effect.
    pub description: &'static str,
    /// Default value.
    pub default: f32,
    /// Inclusive minimum.
    pub min: f32,
    /// Inclusive maximum.
    pub max: f32,
}

/// Looks up the static metadata for a slot.
pub fn info(param: Param) -> &'static ParamInfo {
    &INFO[param.index()]
}

// Indexed by Param declaration order.
static INFO: [ParamInfo; Param::COUNT] = [
    ParamInfo {
        label: "Wave Type",
        description: "Shape of the wave.",
        default: 2.0,
        min: 0.0,
        max: 12.0,
    },
    ParamInfo {
        label: "Sound Volume",
        description: "Overall volume of the current sound.",
        default: 0.5,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Attack Time",
        description: "Length of the volume envelope attack.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Sustain Time",
        description: "Length of the volume envelope sustain.",
        default: 0.3,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Punch",
        description: "Tilts the sustain envelope for more 'pop'.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Decay Time",
        description: "Length of the volume envelope decay.",
        default: 0.4,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Compression",
        description: "Pushes amplitudes together into a narrower range to make them stand out more.",
        default: 0.3,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Frequency",
        description: "Base note of the sound.",
        default: 0.3,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Frequency Cutoff",
        description: "If sliding, the sound will stop at this frequency, to prevent really low notes.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Frequency Slide",
        description: "Slides the frequency up or down.",
        default: 0.0,
        min: -1.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Delta Slide",
        description: "Accelerates the frequency slide. Can be used to get the frequency to change direction.",
        default: 0.0,
        min: -1.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Vibrato Depth",
        description: "Strength of the vibrato effect.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Vibrato Speed",
        description: "Speed of the vibrato effect (i.e. frequency).",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Harmonics",
        description: "Overlays copies of the waveform at multiples of its frequency.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Harmonics Falloff",
        description: "The rate at which higher overtones decay.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Pitch Jump Repeat Speed",
        description: "Larger values mean more pitch jumps, useful for arpeggiation.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Pitch Jump Amount 1",
        description: "Jump in pitch, either up or down.",
        default: 0.0,
        min: -1.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Pitch Jump Onset 1",
        description: "How quickly the note shift happens.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Pitch Jump Amount 2",
        description: "Jump in pitch, either up or down.",
        default: 0.0,
        min: -1.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Pitch Jump Onset 2",
        description: "How quickly the note shift happens.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Square Duty",
        description: "Square waveform only: the ratio between the up and down states of the square wave.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Duty Sweep",
        description: "Square waveform only: sweeps the duty up or down.",
        default: 0.0,
        min: -1.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Repeat Speed",
        description: "Speed of the note repeating - certain variables are reset each time.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Flanger Offset",
        description: "Offsets a second copy of the wave by a small phase, changing the timbre.",
        default: 0.0,
        min: -1.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Flanger Sweep",
        description: "Sweeps the phase up or down.",
        default: 0.0,
        min: -1.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Low-pass Filter Cutoff",
        description: "Frequency at which the low-pass filter starts attenuating higher frequencies.",
        default: 1.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Low-pass Filter Cutoff Sweep",
        description: "Sweeps the low-pass cutoff up or down.",
        default: 0.0,
        min: -1.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Low-pass Filter Resonance",
        description: "Changes the attenuation rate for the low-pass filter, changing the timbre.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "High-pass Filter Cutoff",
        description: "Frequency at which the high-pass filter starts attenuating lower frequencies.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "High-pass Filter Cutoff Sweep",
        description: "Sweeps the high-pass cutoff up or down.",
        default: 0.0,
        min: -1.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Bit Crush",
        description: "Resamples the audio at a lower frequency.",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    ParamInfo {
        label: "Bit Crush Sweep",
        description: "Sweeps the bit crush up or down.",
        default: 0.0,
        min: -1.0,
        max: 1.0,
    },
];

/// Bounded, lockable storage for every parameter slot.
///
/// Values are clamped into the slot's `[min, max]` range on every write.
/// A fresh set holds each slot's default with only [`Param::MasterVolume`]
/// locked (the one permanently protected default).
#[derive(Debug, Clone)]
pub struct ParameterSet {
    values: [f32; Param::COUNT],
    locked: [bool; Param::COUNT],
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterSet {
    /// Creates a set with all-default values and only MasterVolume locked.
    pub fn new() -> Self {
        let mut values = [0.0; Param::COUNT];
        for param in Param::ALL {
            values[param.index()] = info(param).default;
        }
        let mut locked = [false; Param::COUNT];
        locked[Param::MasterVolume.index()] = true;
        Self { values, locked }
    }

    /// Returns the current value of a slot.
    #[inline]
    pub fn get(&self, param: Param) -> f32 {
        self.values[param.index()]
    }

    /// Writes a slot, clamping the value into the slot's range.
    ///
    /// Ignores the lock flag; this is the form used when explicit caller
    /// intent must win (e.g. overlaying an `EffectParams` record).
    pub fn set(&mut self, param: Param, value: f32) {
        let meta = info(param);
        self.values[param.index()] = value.clamp(meta.min, meta.max);
    }

    /// Writes a slot like [`set`](Self::set), but is a no-op when the slot
    /// is locked. Templates and randomization use this form so that
    /// caller-pinned slots are left untouched.
    pub fn set_checked(&mut self, param: Param, value: f32) {
        if !self.is_locked(param) {
            self.set(param, value);
        }
    }

    /// Returns whether a slot is locked.
    #[inline]
    pub fn is_locked(&self, param: Param) -> bool {
        self.locked[param.index()]
    }

    /// Locks or unlocks a single slot.
    pub fn set_locked(&mut self, param: Param, locked: bool) {
        self.locked[param.index()] = locked;
    }

    /// Locks or unlocks every slot.
    pub fn set_all_locked(&mut self, locked: bool) {
        self.locked = [locked; Param::COUNT];
    }

    /// Restores slots to their defaults, respecting locks.
    ///
    /// With `subset = None` every unlocked slot is restored; when
    /// additionally `allow_unlock` is true, all locks are cleared first and
    /// MasterVolume is re-locked as the sole protected slot. With a subset,
    /// only the listed slots are restored (locks still respected, lock
    /// state untouched).
    pub fn reset_all(&mut self, subset: Option<&[Param]>, allow_unlock: bool) {
        if allow_unlock && subset.is_none() {
            self.locked = [false; Param::COUNT];
            self.locked[Param::MasterVolume.index()] = true;
        }

        for param in Param::ALL {
            let listed = subset.map_or(true, |s| s.contains(&param));
            if listed && !self.is_locked(param) {
                self.values[param.index()] = info(param).default;
            }
        }
    }

    /// Default value of a slot.
    pub fn default_of(&self, param: Param) -> f32 {
        info(param).default
    }

    /// Inclusive minimum of a slot.
    pub fn min_of(&self, param: Param) -> f32 {
        info(param).min
    }

    /// Inclusive maximum of a slot.
    pub fn max_of(&self, param: Param) -> f32 {
        info(param).max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_set_holds_defaults() {
        let set = ParameterSet::new();
        for param in Param::ALL {
            assert_eq!(set.get(param), info(param).default, "{}", param.name());
        }
    }

    #[test]
    fn test_only_master_volume_locked_by_default() {
        let set = ParameterSet::new();
        for param in Param::ALL {
            assert_eq!(set.is_locked(param), param == Param::MasterVolume);
        }
    }

    #[test]
    fn test_set_clamps_into_range() {
        let mut set = ParameterSet::new();

        set.set(Param::StartFrequency, 2.5);
        assert_eq!(set.get(Param::StartFrequency), 1.0);

        set.set(Param::Slide, -7.0);
        assert_eq!(set.get(Param::Slide), -1.0);

        set.set(Param::Slide, 0.25);
        assert_eq!(set.get(Param::Slide), 0.25);
    }

    #[test]
    fn test_set_checked_respects_lock() {
        let mut set = ParameterSet::new();
        set.set(Param::StartFrequency, 0.8);
        set.set_locked(Param::StartFrequency, true);

        set.set_checked(Param::StartFrequency, 0.1);
        assert_eq!(set.get(Param::StartFrequency), 0.8);

        // The unchecked form overrides locks.
        set.set(Param::StartFrequency, 0.1);
        assert_eq!(set.get(Param::StartFrequency), 0.1);
    }

    #[test]
    fn test_reset_all_restores_defaults_and_relocks_volume() {
        let mut set = ParameterSet::new();
        set.set_all_locked(false);
        set.set(Param::DecayTime, 0.9);
        set.set(Param::MasterVolume, 0.1);

        set.reset_all(None, true);

        assert_eq!(set.get(Param::DecayTime), info(Param::DecayTime).default);
        // The unlock pass reinstates the MasterVolume lock before restoring
        // values, so its value survives the reset.
        assert_eq!(set.get(Param::MasterVolume), 0.1);
        assert!(set.is_locked(Param::MasterVolume));
    }

    #[test]
    fn test_reset_all_without_unlock_skips_locked() {
        let mut set = ParameterSet::new();
        set.set(Param::DecayTime, 0.9);
        set.set_locked(Param::DecayTime, true);
        set.set(Param::SustainTime, 0.9);

        set.reset_all(None, false);

        assert_eq!(set.get(Param::DecayTime), 0.9);
        assert_eq!(set.get(Param::SustainTime), info(Param::SustainTime).default);
        assert!(set.is_locked(Param::DecayTime));
    }

    #[test]
    fn test_reset_subset_only_touches_listed_slots() {
        let mut set = ParameterSet::new();
        set.set(Param::DecayTime, 0.9);
        set.set(Param::SustainTime, 0.9);

        set.reset_all(Some(&[Param::SustainTime]), true);

        assert_eq!(set.get(Param::DecayTime), 0.9);
        assert_eq!(set.get(Param::SustainTime), info(Param::SustainTime).default);
    }

    #[test]
    fn test_from_name_roundtrip() {
        for param in Param::ALL {
            assert_eq!(Param::from_name(param.name()).unwrap(), param);
        }
        assert!(Param::from_name("NotASlot").is_err());
    }
}
