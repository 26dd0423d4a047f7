//! The public effect-parameter record and effect categories.
//!
//! [`EffectParams`] is the flat, named view of the same 32 control slots
//! stored in a [`ParameterSet`]. Fields left at their sentinel "unset"
//! value mean "keep whatever the template or randomization produced" when
//! the record is overlaid onto a set; a snapshot taken after generation has
//! every field populated.

use std::fmt;

use crate::param::{Param, ParameterSet};

/// The closed set of effect categories a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EffectKind {
    /// Full-spectrum randomization, no template.
    #[default]
    None,
    /// Pickup / coin.
    Pickup,
    /// Laser / shoot.
    Laser,
    /// Explosion.
    Explosion,
    /// Power-up.
    PowerUp,
    /// Hit / hurt.
    Hit,
    /// Jump.
    Jump,
    /// Blip / select.
    Blip,
}

/// Flat, named record of every control parameter.
///
/// Freshly constructed records have every field at the "unset" sentinel
/// ([`EffectParams::UNSET`], or [`EffectParams::UNSET_WAVE_TYPE`] for the
/// wave index). A partially filled record can be overlaid onto a
/// [`ParameterSet`] with [`apply_to`](EffectParams::apply_to); only the
/// explicitly set fields are written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    /// Shape of the wave (0-12).
    pub wave_type: i32,
    /// Overall volume of the sound.
    pub master_volume: f32,
    /// Length of the volume envelope attack.
    pub attack_time: f32,
    /// Length of the volume envelope sustain.
    pub sustain_time: f32,
    /// Tilts the sustain envelope for more "pop".
    pub sustain_punch: f32,
    /// Length of the volume envelope decay.
    pub decay_time: f32,
    /// Pushes amplitudes together into a narrower range.
    pub compression_amount: f32,
    /// Base note of the sound.
    pub start_frequency: f32,
    /// If sliding, the sound stops at this frequency.
    pub min_frequency: f32,
    /// Slides the frequency up or down.
    pub slide: f32,
    /// Accelerates the frequency slide.
    pub delta_slide: f32,
    /// Strength of the vibrato effect.
    pub vibrato_depth: f32,
    /// Speed of the vibrato effect.
    pub vibrato_speed: f32,
    /// Number of harmonic copies overlaid on the waveform.
    pub overtones: f32,
    /// Decay rate of the higher overtones.
    pub overtone_falloff: f32,
    /// How often the pitch-jump schedules re-arm.
    pub change_repeat: f32,
    /// First pitch jump, up or down.
    pub change_amount: f32,
    /// Onset speed of the first pitch jump.
    pub change_speed: f32,
    /// Second pitch jump, up or down.
    pub change_amount2: f32,
    /// Onset speed of the second pitch jump.
    pub change_speed2: f32,
    /// Square waveform only: up/down state ratio.
    pub square_duty: f32,
    /// Square waveform only: sweeps the duty up or down.
    pub duty_sweep: f32,
    /// Speed of the note repeat.
    pub repeat_speed: f32,
    /// Phase offset of the flanger's delayed copy.
    pub flanger_offset: f32,
    /// Sweeps the flanger phase up or down.
    pub flanger_sweep: f32,
    /// Low-pass filter cutoff.
    pub lp_filter_cutoff: f32,
    /// Sweeps the low-pass cutoff up or down.
    pub lp_filter_cutoff_sweep: f32,
    /// Low-pass filter resonance.
    pub lp_filter_resonance: f32,
    /// High-pass filter cutoff.
    pub hp_filter_cutoff: f32,
    /// Sweeps the high-pass cutoff up or down.
    pub hp_filter_cutoff_sweep: f32,
    /// Resamples the audio at a lower frequency (zero-order hold).
    pub bit_crush: f32,
    /// Sweeps the bit-crush frequency up or down.
    pub bit_crush_sweep: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            wave_type: Self::UNSET_WAVE_TYPE,
            master_volume: Self::UNSET,
            attack_time: Self::UNSET,
            sustain_time: Self::UNSET,
            sustain_punch: Self::UNSET,
            decay_time: Self::UNSET,
            compression_amount: Self::UNSET,
            start_frequency: Self::UNSET,
            min_frequency: Self::UNSET,
            slide: Self::UNSET,
            delta_slide: Self::UNSET,
            vibrato_depth: Self::UNSET,
            vibrato_speed: Self::UNSET,
            overtones: Self::UNSET,
            overtone_falloff: Self::UNSET,
            change_repeat: Self::UNSET,
            change_amount: Self::UNSET,
            change_speed: Self::UNSET,
            change_amount2: Self::UNSET,
            change_speed2: Self::UNSET,
            square_duty: Self::UNSET,
            duty_sweep: Self::UNSET,
            repeat_speed: Self::UNSET,
            flanger_offset: Self::UNSET,
            flanger_sweep: Self::UNSET,
            lp_filter_cutoff: Self::UNSET,
            lp_filter_cutoff_sweep: Self::UNSET,
            lp_filter_resonance: Self::UNSET,
            hp_filter_cutoff: Self::UNSET,
            hp_filter_cutoff_sweep: Self::UNSET,
            bit_crush: Self::UNSET,
            bit_crush_sweep: Self::UNSET,
        }
    }
}

impl EffectParams {
    /// Sentinel marking a float field as "not explicitly set".
    pub const UNSET: f32 = f32::MIN;
    /// Sentinel marking the wave-type field as "not explicitly set".
    pub const UNSET_WAVE_TYPE: i32 = i32::MIN;

    /// Returns whether a float field carries an explicit value.
    #[inline]
    pub fn is_set(value: f32) -> bool {
        value != Self::UNSET
    }

    /// Snapshots every slot of a [`ParameterSet`] into a fully populated
    /// record.
    pub fn from_set(set: &ParameterSet) -> Self {
        Self {
            wave_type: set.get(Param::WaveType) as i32,
            master_volume: set.get(Param::MasterVolume),
            attack_time: set.get(Param::AttackTime),
            sustain_time: set.get(Param::SustainTime),
            sustain_punch: set.get(Param::SustainPunch),
            decay_time: set.get(Param::DecayTime),
            compression_amount: set.get(Param::CompressionAmount),
            start_frequency: set.get(Param::StartFrequency),
            min_frequency: set.get(Param::MinFrequency),
            slide: set.get(Param::Slide),
            delta_slide: set.get(Param::DeltaSlide),
            vibrato_depth: set.get(Param::VibratoDepth),
            vibrato_speed: set.get(Param::VibratoSpeed),
            overtones: set.get(Param::Overtones),
            overtone_falloff: set.get(Param::OvertoneFalloff),
            change_repeat: set.get(Param::ChangeRepeat),
            change_amount: set.get(Param::ChangeAmount),
            change_speed: set.get(Param::ChangeSpeed),
            change_amount2: set.get(Param::ChangeAmount2),
            change_speed2: set.get(Param::ChangeSpeed2),
            square_duty: set.get(Param::SquareDuty),
            duty_sweep: set.get(Param::DutySweep),
            repeat_speed: set.get(Param::RepeatSpeed),
            flanger_offset: set.get(Param::FlangerOffset),
            flanger_sweep: set.get(Param::FlangerSweep),
            lp_filter_cutoff: set.get(Param::LpFilterCutoff),
            lp_filter_cutoff_sweep: set.get(Param::LpFilterCutoffSweep),
            lp_filter_resonance: set.get(Param::LpFilterResonance),
            hp_filter_cutoff: set.get(Param::HpFilterCutoff),
            hp_filter_cutoff_sweep: set.get(Param::HpFilterCutoffSweep),
            bit_crush: set.get(Param::BitCrush),
            bit_crush_sweep: set.get(Param::BitCrushSweep),
        }
    }

    /// Overlays every explicitly set field onto a [`ParameterSet`],
    /// unconditionally overriding current values (locks included).
    pub fn apply_to(&self, set: &mut ParameterSet) {
        for (param, value) in self.slot_values() {
            if Self::is_set(value) {
                set.set(param, value);
            }
        }
    }

    /// Field values keyed by slot, with the wave index widened to f32 and
    /// its sentinel mapped onto the float sentinel.
    fn slot_values(&self) -> [(Param, f32); Param::COUNT] {
        let wave = if self.wave_type == Self::UNSET_WAVE_TYPE {
            Self::UNSET
        } else {
            self.wave_type as f32
        };
        [
            (Param::WaveType, wave),
            (Param::MasterVolume, self.master_volume),
            (Param::AttackTime, self.attack_time),
            (Param::SustainTime, self.sustain_time),
            (Param::SustainPunch, self.sustain_punch),
            (Param::DecayTime, self.decay_time),
            (Param::CompressionAmount, self.compression_amount),
            (Param::StartFrequency, self.start_frequency),
            (Param::MinFrequency, self.min_frequency),
            (Param::Slide, self.slide),
            (Param::DeltaSlide, self.delta_slide),
            (Param::VibratoDepth, self.vibrato_depth),
            (Param::VibratoSpeed, self.vibrato_speed),
            (Param::Overtones, self.overtones),
            (Param::OvertoneFalloff, self.overtone_falloff),
            (Param::ChangeRepeat, self.change_repeat),
            (Param::ChangeAmount, self.change_amount),
            (Param::ChangeSpeed, self.change_speed),
            (Param::ChangeAmount2, self.change_amount2),
            (Param::ChangeSpeed2, self.change_speed2),
            (Param::SquareDuty, self.square_duty),
            (Param::DutySweep, self.duty_sweep),
            (Param::RepeatSpeed, self.repeat_speed),
            (Param::FlangerOffset, self.flanger_offset),
            (Param::FlangerSweep, self.flanger_sweep),
            (Param::LpFilterCutoff, self.lp_filter_cutoff),
            (Param::LpFilterCutoffSweep, self.lp_filter_cutoff_sweep),
            (Param::LpFilterResonance, self.lp_filter_resonance),
            (Param::HpFilterCutoff, self.hp_filter_cutoff),
            (Param::HpFilterCutoffSweep, self.hp_filter_cutoff_sweep),
            (Param::BitCrush, self.bit_crush),
            (Param::BitCrushSweep, self.bit_crush_sweep),
        ]
    }
}

impl fmt::Display for EffectParams {
    /// Renders one `Name = value` line per slot, for debugging and
    /// inspection of generated clips.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WaveType = {}", self.wave_type)?;
        for (param, value) in self.slot_values().iter().skip(1) {
            writeln!(f, "{} = {}", param.name(), value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_record_is_fully_unset() {
        let record = EffectParams::default();
        assert_eq!(record.wave_type, EffectParams::UNSET_WAVE_TYPE);
        for (_, value) in record.slot_values().iter().skip(1) {
            assert!(!EffectParams::is_set(*value));
        }
    }

    #[test]
    fn test_apply_to_writes_only_set_fields() {
        let mut set = ParameterSet::new();
        let record = EffectParams {
            start_frequency: 0.8,
            decay_time: 0.2,
            ..EffectParams::default()
        };

        record.apply_to(&mut set);

        assert_eq!(set.get(Param::StartFrequency), 0.8);
        assert_eq!(set.get(Param::DecayTime), 0.2);
        // Unset fields leave the defaults alone.
        assert_eq!(set.get(Param::SustainTime), 0.3);
        assert_eq!(set.get(Param::WaveType), 2.0);
    }

    #[test]
    fn test_apply_to_overrides_locked_slots() {
        let mut set = ParameterSet::new();
        set.set_locked(Param::StartFrequency, true);
        let record = EffectParams {
            start_frequency: 0.8,
            ..EffectParams::default()
        };

        record.apply_to(&mut set);

        assert_eq!(set.get(Param::StartFrequency), 0.8);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut set = ParameterSet::new();
        set.set(Param::WaveType, 5.0);
        set.set(Param::Slide, -0.4);

        let record = EffectParams::from_set(&set);
        assert_eq!(record.wave_type, 5);
        assert_eq!(record.slide, -0.4);

        let mut other = ParameterSet::new();
        record.apply_to(&mut other);
        for param in Param::ALL {
            assert_eq!(other.get(param), set.get(param), "{}", param.name());
        }
    }

    #[test]
    fn test_display_lists_every_slot() {
        let set = ParameterSet::new();
        let dump = EffectParams::from_set(&set).to_string();
        for param in Param::ALL {
            assert!(dump.contains(param.name()), "missing {}", param.name());
        }
        assert!(dump.contains("LpFilterCutoff = 1"));
    }
}
