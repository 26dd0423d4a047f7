//! Category templates, full randomization, and mutation.
//!
//! Each template resets the parameter set to defaults (honoring locks) and
//! then draws a hand-tuned distribution for its sound category. All writes
//! go through [`ParameterSet::set_checked`], so locked slots keep their
//! pinned values while the rest of the sound is rolled around them.

use rand::Rng;
use rand_pcg::Pcg32;
use retrofx_params::{Param, ParameterSet};

/// Exponents applied to the uniform draw for slots where a linear
/// distribution sounds wrong; values above 1 bias toward the minimum.
fn randomization_power(param: Param) -> Option<f32> {
    match param {
        Param::AttackTime | Param::BitCrush => Some(4.0),
        Param::SustainTime | Param::SustainPunch => Some(2.0),
        Param::Overtones
        | Param::VibratoDepth
        | Param::DutySweep
        | Param::FlangerOffset
        | Param::FlangerSweep
        | Param::LpFilterCutoffSweep => Some(3.0),
        Param::OvertoneFalloff => Some(0.25),
        Param::LpFilterCutoff => Some(0.3),
        Param::HpFilterCutoff | Param::HpFilterCutoffSweep | Param::BitCrushSweep => Some(5.0),
        _ => None,
    }
}

/// Relative draw weights per wave shape, indexed by wave-type value.
const WAVE_TYPE_WEIGHTS: [u32; 12] = [
    1, // square
    1, // saw
    1, // sine
    1, // white noise
    1, // triangle
    1, // pink noise
    1, // tangent
    1, // whistle
    1, // breaker
    1, // one-bit noise
    1, // cycle
    1, // buzz
];

/// Short ascending chime, optionally with an upward pitch jump a fixed
/// fraction of the way in.
pub fn pickup_coin(set: &mut ParameterSet, rng: &mut Pcg32) {
    set.reset_all(None, false);

    set.set_checked(Param::StartFrequency, 0.4 + rng.gen::<f32>() * 0.5);
    set.set_checked(Param::SustainTime, rng.gen::<f32>() * 0.1);
    set.set_checked(Param::DecayTime, 0.1 + rng.gen::<f32>() * 0.4);
    set.set_checked(Param::SustainPunch, 0.3 + rng.gen::<f32>() * 0.3);

    if rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::ChangeSpeed, 0.5 + rng.gen::<f32>() * 0.2);
        // Jump by a simple frequency ratio so the second note harmonizes.
        let numerator = (rng.gen::<f32>() * 7.0) as i32 + 1;
        let denominator = numerator + (rng.gen::<f32>() * 7.0) as i32 + 2;
        set.set_checked(Param::ChangeAmount, numerator as f32 / denominator as f32);
    }
}

/// Downward-sliding zap on a square, saw, or sine wave.
pub fn laser_shoot(set: &mut ParameterSet, rng: &mut Pcg32) {
    set.reset_all(None, false);

    set.set_checked(Param::WaveType, (rng.gen::<f32>() * 3.0) as u32 as f32);
    if set.get(Param::WaveType) as i32 == 2 && rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::WaveType, (rng.gen::<f32>() * 2.0) as u32 as f32);
    }

    set.set_checked(Param::StartFrequency, 0.5 + rng.gen::<f32>() * 0.5);
    set.set_checked(
        Param::MinFrequency,
        set.get(Param::StartFrequency) - 0.2 - rng.gen::<f32>() * 0.6,
    );
    if set.get(Param::MinFrequency) < 0.2 {
        set.set_checked(Param::MinFrequency, 0.2);
    }

    set.set_checked(Param::Slide, -0.15 - rng.gen::<f32>() * 0.2);

    // One in three lasers is a deeper, slower variant.
    if rng.gen::<f32>() < 0.33 {
        set.set_checked(Param::StartFrequency, rng.gen::<f32>() * 0.6);
        set.set_checked(Param::MinFrequency, rng.gen::<f32>() * 0.1);
        set.set_checked(Param::Slide, -0.35 - rng.gen::<f32>() * 0.3);
    }

    if rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::SquareDuty, rng.gen::<f32>() * 0.5);
        set.set_checked(Param::DutySweep, rng.gen::<f32>() * 0.2);
    } else {
        set.set_checked(Param::SquareDuty, 0.4 + rng.gen::<f32>() * 0.5);
        set.set_checked(Param::DutySweep, -rng.gen::<f32>() * 0.7);
    }

    set.set_checked(Param::SustainTime, 0.1 + rng.gen::<f32>() * 0.2);
    set.set_checked(Param::DecayTime, rng.gen::<f32>() * 0.4);
    if rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::SustainPunch, rng.gen::<f32>() * 0.3);
    }

    if rng.gen::<f32>() < 0.33 {
        set.set_checked(Param::FlangerOffset, rng.gen::<f32>() * 0.2);
        set.set_checked(Param::FlangerSweep, -rng.gen::<f32>() * 0.2);
    }

    if rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::HpFilterCutoff, rng.gen::<f32>() * 0.3);
    }
}

/// Noisy boom on white or one-bit noise with heavy punch.
pub fn explosion(set: &mut ParameterSet, rng: &mut Pcg32) {
    set.reset_all(None, false);

    if rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::WaveType, 3.0);
    } else {
        set.set_checked(Param::WaveType, 9.0);
    }

    if rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::StartFrequency, 0.1 + rng.gen::<f32>() * 0.4);
        set.set_checked(Param::Slide, -0.1 + rng.gen::<f32>() * 0.4);
    } else {
        set.set_checked(Param::StartFrequency, 0.2 + rng.gen::<f32>() * 0.7);
        set.set_checked(Param::Slide, -0.2 - rng.gen::<f32>() * 0.2);
    }

    // Squaring pushes the distribution toward the rumbling low end.
    let start_frequency = set.get(Param::StartFrequency);
    set.set_checked(Param::StartFrequency, start_frequency * start_frequency);

    if rng.gen::<f32>() < 0.2 {
        set.set_checked(Param::Slide, 0.0);
    }
    if rng.gen::<f32>() < 0.33 {
        set.set_checked(Param::RepeatSpeed, 0.3 + rng.gen::<f32>() * 0.5);
    }

    set.set_checked(Param::SustainTime, 0.1 + rng.gen::<f32>() * 0.3);
    set.set_checked(Param::DecayTime, rng.gen::<f32>() * 0.5);
    set.set_checked(Param::SustainPunch, 0.2 + rng.gen::<f32>() * 0.6);

    if rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::FlangerOffset, -0.3 + rng.gen::<f32>() * 0.9);
        set.set_checked(Param::FlangerSweep, -rng.gen::<f32>() * 0.3);
    }

    if rng.gen::<f32>() < 0.33 {
        set.set_checked(Param::ChangeSpeed, 0.6 + rng.gen::<f32>() * 0.3);
        set.set_checked(Param::ChangeAmount, 0.8 - rng.gen::<f32>() * 1.6);
    }
}

/// Rising tone, either repeating or vibrato-laden.
pub fn power_up(set: &mut ParameterSet, rng: &mut Pcg32) {
    set.reset_all(None, false);

    if rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::WaveType, 1.0);
    } else {
        set.set_checked(Param::SquareDuty, rng.gen::<f32>() * 0.6);
    }

    if rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::StartFrequency, 0.2 + rng.gen::<f32>() * 0.3);
        set.set_checked(Param::Slide, 0.1 + rng.gen::<f32>() * 0.4);
        set.set_checked(Param::RepeatSpeed, 0.4 + rng.gen::<f32>() * 0.4);
    } else {
        set.set_checked(Param::StartFrequency, 0.2 + rng.gen::<f32>() * 0.3);
        set.set_checked(Param::Slide, 0.05 + rng.gen::<f32>() * 0.2);

        if rng.gen::<f32>() < 0.5 {
            set.set_checked(Param::VibratoDepth, rng.gen::<f32>() * 0.7);
            set.set_checked(Param::VibratoSpeed, rng.gen::<f32>() * 0.6);
        }
    }

    set.set_checked(Param::SustainTime, rng.gen::<f32>() * 0.4);
    set.set_checked(Param::DecayTime, 0.1 + rng.gen::<f32>() * 0.4);
}

/// Short falling impact on square, saw, white noise, or one-bit noise.
pub fn hit_hurt(set: &mut ParameterSet, rng: &mut Pcg32) {
    set.reset_all(None, false);

    set.set_checked(Param::WaveType, (rng.gen::<f32>() * 4.0) as u32 as f32);
    if set.get(Param::WaveType) as i32 == 2 {
        // Sine reads too soft for an impact.
        set.set_checked(Param::WaveType, 3.0);
    } else if set.get(Param::WaveType) as i32 == 3 {
        set.set_checked(Param::WaveType, 9.0);
    } else if set.get(Param::WaveType) as i32 == 0 {
        set.set_checked(Param::SquareDuty, rng.gen::<f32>() * 0.6);
    }

    set.set_checked(Param::StartFrequency, 0.2 + rng.gen::<f32>() * 0.6);
    set.set_checked(Param::Slide, -0.3 - rng.gen::<f32>() * 0.4);

    set.set_checked(Param::SustainTime, rng.gen::<f32>() * 0.1);
    set.set_checked(Param::DecayTime, 0.1 + rng.gen::<f32>() * 0.2);

    if rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::HpFilterCutoff, rng.gen::<f32>() * 0.3);
    }
}

/// Square-wave hop with an upward slide.
pub fn jump(set: &mut ParameterSet, rng: &mut Pcg32) {
    set.reset_all(None, false);

    set.set_checked(Param::WaveType, 0.0);
    set.set_checked(Param::SquareDuty, rng.gen::<f32>() * 0.6);
    set.set_checked(Param::StartFrequency, 0.3 + rng.gen::<f32>() * 0.3);
    set.set_checked(Param::Slide, 0.1 + rng.gen::<f32>() * 0.2);

    set.set_checked(Param::SustainTime, 0.1 + rng.gen::<f32>() * 0.3);
    set.set_checked(Param::DecayTime, 0.1 + rng.gen::<f32>() * 0.2);

    if rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::HpFilterCutoff, rng.gen::<f32>() * 0.3);
    }
    if rng.gen::<f32>() < 0.5 {
        set.set_checked(Param::LpFilterCutoff, 1.0 - rng.gen::<f32>() * 0.6);
    }
}

/// Tiny UI click on a square or saw wave.
pub fn blip_select(set: &mut ParameterSet, rng: &mut Pcg32) {
    set.reset_all(None, false);

    set.set_checked(Param::WaveType, (rng.gen::<f32>() * 2.0) as u32 as f32);
    if set.get(Param::WaveType) as i32 == 0 {
        set.set_checked(Param::SquareDuty, rng.gen::<f32>() * 0.6);
    }

    set.set_checked(Param::StartFrequency, 0.2 + rng.gen::<f32>() * 0.4);

    set.set_checked(Param::SustainTime, 0.1 + rng.gen::<f32>() * 0.1);
    set.set_checked(Param::DecayTime, rng.gen::<f32>() * 0.2);
    set.set_checked(Param::HpFilterCutoff, 0.1);
}

/// Rolls every unlocked slot, then applies corrective rules so the result
/// is usually audible rather than a screech or a near-silence.
pub fn randomize(set: &mut ParameterSet, rng: &mut Pcg32) {
    for param in Param::ALL {
        if set.is_locked(param) {
            continue;
        }
        let min = set.min_of(param);
        let max = set.max_of(param);
        let mut r = rng.gen::<f32>();
        if let Some(power) = randomization_power(param) {
            r = r.powf(power);
        }
        set.set(param, min + (max - min) * r);
    }

    if !set.is_locked(Param::WaveType) {
        let total: u32 = WAVE_TYPE_WEIGHTS.iter().sum();
        let mut r = rng.gen::<f32>() * total as f32;
        for (index, weight) in WAVE_TYPE_WEIGHTS.iter().enumerate() {
            r -= *weight as f32;
            if r <= 0.0 {
                set.set(Param::WaveType, index as f32);
                break;
            }
        }
    }

    if !set.is_locked(Param::RepeatSpeed) && rng.gen::<f32>() < 0.5 {
        set.set(Param::RepeatSpeed, 0.0);
    }

    if !set.is_locked(Param::Slide) {
        let r = rng.gen::<f32>() * 2.0 - 1.0;
        set.set(Param::Slide, r.powi(5));
    }
    if !set.is_locked(Param::DeltaSlide) {
        let r = rng.gen::<f32>() * 2.0 - 1.0;
        set.set(Param::DeltaSlide, r.powi(3));
    }

    if !set.is_locked(Param::MinFrequency) {
        set.set(Param::MinFrequency, 0.0);
    }

    if !set.is_locked(Param::StartFrequency) {
        let value = if rng.gen::<f32>() < 0.5 {
            (rng.gen::<f32>() * 2.0 - 1.0).powi(2)
        } else {
            (rng.gen::<f32>() * 0.5).powi(3) + 0.5
        };
        set.set(Param::StartFrequency, value);
    }

    if !set.is_locked(Param::SustainTime) && !set.is_locked(Param::DecayTime) {
        let total = set.get(Param::AttackTime)
            + set.get(Param::SustainTime)
            + set.get(Param::DecayTime);
        if total < 0.2 {
            set.set(Param::SustainTime, 0.2 + rng.gen::<f32>() * 0.3);
            set.set(Param::DecayTime, 0.2 + rng.gen::<f32>() * 0.3);
        }
    }

    if !set.is_locked(Param::Slide) {
        let start_frequency = set.get(Param::StartFrequency);
        let slide = set.get(Param::Slide);
        // Flip slides that would immediately run the pitch off either end
        // of the audible range.
        if (start_frequency > 0.7 && slide > 0.2)
            || (start_frequency < 0.2 && slide < -0.05)
        {
            set.set(Param::Slide, -slide);
        }
    }

    if !set.is_locked(Param::LpFilterCutoffSweep) {
        let cutoff = set.get(Param::LpFilterCutoff);
        let sweep = set.get(Param::LpFilterCutoffSweep);
        if cutoff < 0.1 && sweep < -0.05 {
            set.set(Param::LpFilterCutoffSweep, -sweep);
        }
    }
}

/// Nudges roughly half of the unlocked slots by up to `mutation` in either
/// direction. The current values are the starting point, so repeated calls
/// walk the sound around its neighborhood.
pub fn mutate(set: &mut ParameterSet, rng: &mut Pcg32, mutation: f32) {
    for param in Param::ALL {
        if !set.is_locked(param) && rng.gen::<f32>() < 0.5 {
            set.set(
                param,
                set.get(param) + rng.gen::<f32>() * mutation * 2.0 - mutation,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use pretty_assertions::assert_eq;

    fn all_within_bounds(set: &ParameterSet) -> bool {
        Param::ALL.iter().all(|&param| {
            let value = set.get(param);
            value >= set.min_of(param) && value <= set.max_of(param)
        })
    }

    #[test]
    fn test_templates_produce_in_bounds_parameters() {
        type Template = fn(&mut ParameterSet, &mut Pcg32);
        let templates: [Template; 7] = [
            pickup_coin,
            laser_shoot,
            explosion,
            power_up,
            hit_hurt,
            jump,
            blip_select,
        ];
        for (index, template) in templates.iter().enumerate() {
            for seed in 1..20u32 {
                let mut set = ParameterSet::new();
                let mut rng = create_rng(seed * 31 + index as u32);
                template(&mut set, &mut rng);
                assert!(all_within_bounds(&set), "template {index} seed {seed}");
            }
        }
    }

    #[test]
    fn test_explosion_picks_noise_shapes() {
        for seed in 1..50u32 {
            let mut set = ParameterSet::new();
            let mut rng = create_rng(seed);
            explosion(&mut set, &mut rng);
            let wave = set.get(Param::WaveType) as i32;
            assert!(wave == 3 || wave == 9, "seed {seed}: wave {wave}");
        }
    }

    #[test]
    fn test_jump_is_always_square() {
        for seed in 1..20u32 {
            let mut set = ParameterSet::new();
            let mut rng = create_rng(seed);
            jump(&mut set, &mut rng);
            assert_eq!(set.get(Param::WaveType), 0.0);
        }
    }

    #[test]
    fn test_templates_respect_locks() {
        let mut set = ParameterSet::new();
        set.set(Param::StartFrequency, 0.8);
        set.set_locked(Param::StartFrequency, true);

        let mut rng = create_rng(11);
        pickup_coin(&mut set, &mut rng);
        assert_eq!(set.get(Param::StartFrequency), 0.8);

        let mut rng = create_rng(12);
        laser_shoot(&mut set, &mut rng);
        assert_eq!(set.get(Param::StartFrequency), 0.8);
    }

    #[test]
    fn test_randomize_respects_locks() {
        let mut set = ParameterSet::new();
        set.set(Param::WaveType, 7.0);
        set.set_locked(Param::WaveType, true);
        set.set(Param::SustainPunch, 0.42);
        set.set_locked(Param::SustainPunch, true);

        let mut rng = create_rng(23);
        randomize(&mut set, &mut rng);

        assert_eq!(set.get(Param::WaveType), 7.0);
        assert_eq!(set.get(Param::SustainPunch), 0.42);
    }

    #[test]
    fn test_randomize_is_deterministic_per_seed() {
        let mut set1 = ParameterSet::new();
        let mut rng1 = create_rng(404);
        randomize(&mut set1, &mut rng1);

        let mut set2 = ParameterSet::new();
        let mut rng2 = create_rng(404);
        randomize(&mut set2, &mut rng2);

        for param in Param::ALL {
            assert_eq!(set1.get(param), set2.get(param), "{}", param.name());
        }
    }

    #[test]
    fn test_randomize_avoids_silent_envelopes() {
        for seed in 1..50u32 {
            let mut set = ParameterSet::new();
            let mut rng = create_rng(seed);
            randomize(&mut set, &mut rng);
            let total = set.get(Param::AttackTime)
                + set.get(Param::SustainTime)
                + set.get(Param::DecayTime);
            assert!(total >= 0.2, "seed {seed}: envelope {total}");
        }
    }

    #[test]
    fn test_mutate_zero_amount_is_identity() {
        let mut set = ParameterSet::new();
        let mut rng = create_rng(31);
        randomize(&mut set, &mut rng);
        let before: Vec<f32> = Param::ALL.iter().map(|&p| set.get(p)).collect();

        mutate(&mut set, &mut rng, 0.0);
        let after: Vec<f32> = Param::ALL.iter().map(|&p| set.get(p)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_mutate_stays_in_bounds() {
        let mut set = ParameterSet::new();
        let mut rng = create_rng(67);
        for _ in 0..20 {
            mutate(&mut set, &mut rng, 0.05);
            assert!(all_within_bounds(&set));
        }
    }
}
