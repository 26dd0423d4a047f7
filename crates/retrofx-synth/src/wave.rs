//! Oscillator wave shapes.

/// Shape of the oscillator wave.
///
/// The discriminants match the `WaveType` parameter slot, so a slot value
/// converts directly with [`Waveform::from_index`]. Indices outside the
/// table render as silence rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square = 0,
    Saw = 1,
    Sine = 2,
    WhiteNoise = 3,
    Triangle = 4,
    PinkNoise = 5,
    Tangent = 6,
    Whistle = 7,
    Breaker = 8,
    OneBitNoise = 9,
    /// Cycles through shapes 0-9 every four phase steps.
    Cycle = 10,
    Buzz = 11,
}

impl Waveform {
    /// Number of selectable wave shapes.
    pub const COUNT: u32 = 12;

    pub fn from_index(index: u32) -> Option<Waveform> {
        match index {
            0 => Some(Waveform::Square),
            1 => Some(Waveform::Saw),
            2 => Some(Waveform::Sine),
            3 => Some(Waveform::WhiteNoise),
            4 => Some(Waveform::Triangle),
            5 => Some(Waveform::PinkNoise),
            6 => Some(Waveform::Tangent),
            7 => Some(Waveform::Whistle),
            8 => Some(Waveform::Breaker),
            9 => Some(Waveform::OneBitNoise),
            10 => Some(Waveform::Cycle),
            11 => Some(Waveform::Buzz),
            _ => None,
        }
    }
}

/// Fast parabolic sine approximation over one normalized period.
///
/// `pos` is the phase in [0, 1). Roughly an order of magnitude cheaper than
/// `f32::sin` and accurate to about 0.1% after the refinement step, which
/// is plenty for an audible oscillator.
pub fn fast_sin(pos: f32) -> f32 {
    // Fold [0, 1) onto [-pi, pi]
    let pos = if pos > 0.5 {
        (pos - 1.0) * 6.283_185_3
    } else {
        pos * 6.283_185_3
    };

    let temp_phase = if pos < 0.0 {
        1.273_239_5 * pos + 0.405_284_73 * pos * pos
    } else {
        1.273_239_5 * pos - 0.405_284_73 * pos * pos
    };

    if temp_phase < 0.0 {
        0.225 * (temp_phase * -temp_phase - temp_phase) + temp_phase
    } else {
        0.225 * (temp_phase * temp_phase - temp_phase) + temp_phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index_covers_all_shapes() {
        for index in 0..Waveform::COUNT {
            assert!(Waveform::from_index(index).is_some());
        }
        assert_eq!(Waveform::from_index(12), None);
        assert_eq!(Waveform::from_index(u32::MAX), None);
    }

    #[test]
    fn test_fast_sin_tracks_reference_sine() {
        for step in 0..100 {
            let pos = step as f32 / 100.0;
            let reference = (pos * std::f32::consts::TAU).sin();
            assert!(
                (fast_sin(pos) - reference).abs() < 0.01,
                "pos {pos}: approx {} vs {reference}",
                fast_sin(pos)
            );
        }
    }

    #[test]
    fn test_fast_sin_zero_crossings() {
        assert_eq!(fast_sin(0.0), 0.0);
        assert!(fast_sin(0.25) > 0.99);
        assert!(fast_sin(0.75) < -0.99);
    }
}
