//! Core sample-synthesis engine.
//!
//! [`Generator`] owns a [`ParameterSet`] plus all running synthesis state:
//! the wave period, envelope stages, filter and flanger positions, and the
//! noise ring buffers. A clip is rendered by calling [`Generator::reset`]
//! with `total_reset = true` and then streaming samples out of
//! [`Generator::generate`]. The repeat effect re-enters `reset` with
//! `total_reset = false`, which re-derives the pitch-schedule state without
//! touching envelopes, filters, or noise.
//!
//! Everything runs in `f32`. Formulas are intentionally magic-number heavy;
//! the constants are the sound, so they are kept inline rather than named.

use rand::Rng;
use rand_pcg::Pcg32;
use retrofx_params::{Param, ParameterSet};

use crate::error::{SynthError, SynthResult};
use crate::pink::PinkNoise;
use crate::wave::{fast_sin, Waveform};

/// Attack + sustain + decay are scaled up to at least this many seconds.
const MIN_LENGTH: f32 = 0.18;
/// Every n-th entry of the lo-res noise ring is a fresh draw; the rest hold.
const LO_RES_NOISE_PERIOD: usize = 8;
/// Length of the noise ring buffers.
const NOISE_BUFFER_LEN: usize = 32;
/// Length of the flanger delay ring; offsets are masked with `& 1023`.
const FLANGER_BUFFER_LEN: usize = 1024;

/// Oversampling factor per output sample.
const SUPERSAMPLES: usize = 8;

/// Sample rates the renderer accepts.
const SUPPORTED_SAMPLE_RATES: [u32; 3] = [22050, 44100, 48000];
/// Bit depths downstream encoders can handle.
const SUPPORTED_BIT_DEPTHS: [u32; 4] = [8, 16, 24, 32];

/// Streaming sound-effect generator.
pub struct Generator {
    params: ParameterSet,
    pink: PinkNoise,

    finished: bool,
    wave_type: u32,

    envelope_volume: f32,
    envelope_stage: u32,
    envelope_time: f32,
    envelope_length: f32,
    envelope_length0: f32,
    envelope_length1: f32,
    envelope_length2: f32,
    envelope_over_length0: f32,
    envelope_over_length1: f32,
    envelope_over_length2: f32,
    envelope_full_length: usize,
    sustain_punch: f32,

    phase: i32,
    period: f32,
    period_temp: f32,
    max_period: f32,

    slide: f32,
    delta_slide: f32,
    min_frequency: f32,
    muted: bool,

    overtones: i32,
    overtone_falloff: f32,

    vibrato_phase: f32,
    vibrato_speed: f32,
    vibrato_amplitude: f32,

    change_period: f32,
    change_period_time: i32,
    change_amount: f32,
    change_time: i32,
    change_limit: i32,
    change_reached: bool,
    change_amount2: f32,
    change_time2: i32,
    change_limit2: i32,
    change_reached2: bool,

    square_duty: f32,
    duty_sweep: f32,

    repeat_time: i32,
    repeat_limit: i32,

    flanger: bool,
    flanger_offset: f32,
    flanger_delta_offset: f32,
    flanger_int: i32,
    flanger_pos: i32,
    flanger_buffer: Box<[f32; FLANGER_BUFFER_LEN]>,

    filters: bool,
    lp_filter_pos: f32,
    lp_filter_old_pos: f32,
    lp_filter_delta_pos: f32,
    lp_filter_cutoff: f32,
    lp_filter_delta_cutoff: f32,
    lp_filter_damping: f32,
    lp_filter_on: bool,
    hp_filter_pos: f32,
    hp_filter_cutoff: f32,
    hp_filter_delta_cutoff: f32,

    noise_buffer: [f32; NOISE_BUFFER_LEN],
    pink_noise_buffer: [f32; NOISE_BUFFER_LEN],
    lo_res_noise_buffer: [f32; NOISE_BUFFER_LEN],

    one_bit_noise_state: i32,
    one_bit_noise: f32,
    buzz_state: i32,
    buzz: f32,

    bitcrush_freq: f32,
    bitcrush_freq_sweep: f32,
    bitcrush_phase: f32,
    bitcrush_last: f32,

    compression_factor: f32,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Self {
            params: ParameterSet::new(),
            pink: PinkNoise::default(),

            finished: false,
            wave_type: 0,

            envelope_volume: 0.0,
            envelope_stage: 0,
            envelope_time: 0.0,
            envelope_length: 0.0,
            envelope_length0: 0.0,
            envelope_length1: 0.0,
            envelope_length2: 0.0,
            envelope_over_length0: 0.0,
            envelope_over_length1: 0.0,
            envelope_over_length2: 0.0,
            envelope_full_length: 0,
            sustain_punch: 0.0,

            phase: 0,
            period: 0.0,
            period_temp: 0.0,
            max_period: 0.0,

            slide: 0.0,
            delta_slide: 0.0,
            min_frequency: 0.0,
            muted: false,

            overtones: 0,
            overtone_falloff: 0.0,

            vibrato_phase: 0.0,
            vibrato_speed: 0.0,
            vibrato_amplitude: 0.0,

            change_period: 0.0,
            change_period_time: 0,
            change_amount: 0.0,
            change_time: 0,
            change_limit: 0,
            change_reached: false,
            change_amount2: 0.0,
            change_time2: 0,
            change_limit2: 0,
            change_reached2: false,

            square_duty: 0.0,
            duty_sweep: 0.0,

            repeat_time: 0,
            repeat_limit: 0,

            flanger: false,
            flanger_offset: 0.0,
            flanger_delta_offset: 0.0,
            flanger_int: 0,
            flanger_pos: 0,
            flanger_buffer: Box::new([0.0; FLANGER_BUFFER_LEN]),

            filters: false,
            lp_filter_pos: 0.0,
            lp_filter_old_pos: 0.0,
            lp_filter_delta_pos: 0.0,
            lp_filter_cutoff: 0.0,
            lp_filter_delta_cutoff: 0.0,
            lp_filter_damping: 0.0,
            lp_filter_on: false,
            hp_filter_pos: 0.0,
            hp_filter_cutoff: 0.0,
            hp_filter_delta_cutoff: 0.0,

            noise_buffer: [0.0; NOISE_BUFFER_LEN],
            pink_noise_buffer: [0.0; NOISE_BUFFER_LEN],
            lo_res_noise_buffer: [0.0; NOISE_BUFFER_LEN],

            one_bit_noise_state: 1 << 14,
            one_bit_noise: 0.0,
            buzz_state: 1 << 14,
            buzz: 0.0,

            bitcrush_freq: 0.0,
            bitcrush_freq_sweep: 0.0,
            bitcrush_phase: 0.0,
            bitcrush_last: 0.0,

            compression_factor: 1.0,
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }

    /// Number of samples a full render will produce, valid after a total
    /// reset.
    pub fn sample_count(&self) -> usize {
        self.envelope_full_length
    }

    /// Envelope gain at the most recently generated sample, for inspection.
    pub fn envelope_volume(&self) -> f32 {
        self.envelope_volume
    }

    /// Attack + sustain + decay below the length floor get scaled up
    /// proportionally; the adjusted times are written back to the slots so
    /// the snapshot reflects what actually played.
    fn clamp_total_length(&mut self) {
        let attack = self.params.get(Param::AttackTime);
        let sustain = self.params.get(Param::SustainTime);
        let decay = self.params.get(Param::DecayTime);
        let total = attack + sustain + decay;
        if total < MIN_LENGTH {
            let multiplier = MIN_LENGTH / total;
            self.params.set(Param::AttackTime, attack * multiplier);
            self.params.set(Param::SustainTime, sustain * multiplier);
            self.params.set(Param::DecayTime, decay * multiplier);
        }
    }

    /// Re-derives running state from the parameter slots.
    ///
    /// Called once with `total_reset = true` before rendering a clip, and
    /// with `total_reset = false` by the repeat effect, which re-seeds only
    /// the pitch schedule (period, slide, duty, pitch jumps).
    pub fn reset(&mut self, total_reset: bool, rng: &mut Pcg32) {
        let start_frequency = self.params.get(Param::StartFrequency);
        let min_frequency = self.params.get(Param::MinFrequency);
        self.period = 100.0 / (start_frequency * start_frequency + 0.001);
        self.max_period = 100.0 / (min_frequency * min_frequency + 0.001);

        let slide = self.params.get(Param::Slide);
        self.slide = 1.0 - slide * slide * slide * 0.01;
        let delta_slide = self.params.get(Param::DeltaSlide);
        self.delta_slide = -delta_slide * delta_slide * delta_slide * 0.000001;

        if self.params.get(Param::WaveType) as u32 == 0 {
            self.square_duty = 0.5 - self.params.get(Param::SquareDuty) * 0.5;
            self.duty_sweep = -self.params.get(Param::DutySweep) * 0.00005;
        }

        let change_repeat = self.params.get(Param::ChangeRepeat);
        self.change_period = (((1.0 - change_repeat) + 0.1) / 1.1) * 20000.0 + 32.0;
        self.change_period_time = 0;

        let change_amount = self.params.get(Param::ChangeAmount);
        self.change_amount = if change_amount > 0.0 {
            1.0 - change_amount * change_amount * 0.9
        } else {
            1.0 + change_amount * change_amount * 10.0
        };
        self.change_time = 0;
        self.change_reached = false;

        let change_speed = self.params.get(Param::ChangeSpeed);
        self.change_limit = if (change_speed - 1.0).abs() < f32::EPSILON {
            0
        } else {
            ((1.0 - change_speed) * (1.0 - change_speed) * 20000.0 + 32.0).round() as i32
        };

        let change_amount2 = self.params.get(Param::ChangeAmount2);
        self.change_amount2 = if change_amount2 > 0.0 {
            1.0 - change_amount2 * change_amount2 * 0.9
        } else {
            1.0 + change_amount2 * change_amount2 * 10.0
        };
        self.change_time2 = 0;
        self.change_reached2 = false;

        let change_speed2 = self.params.get(Param::ChangeSpeed2);
        self.change_limit2 = if (change_speed2 - 1.0).abs() < f32::EPSILON {
            0
        } else {
            ((1.0 - change_speed2) * (1.0 - change_speed2) * 20000.0 + 32.0).round() as i32
        };

        // The two repeat scalings are parenthesized differently on purpose;
        // evening them out changes the character of arpeggiated sounds.
        self.change_limit *= (1.0 - change_repeat + 0.1 / 1.1).round() as i32;
        self.change_limit2 *= ((1.0 - change_repeat + 0.1) / 1.1).round() as i32;

        if total_reset {
            self.wave_type = self.params.get(Param::WaveType) as u32;

            if self.params.get(Param::SustainTime) < 0.01 {
                self.params.set(Param::SustainTime, 0.01);
            }
            self.clamp_total_length();

            self.sustain_punch = self.params.get(Param::SustainPunch);

            self.phase = 0;

            self.min_frequency = self.params.get(Param::MinFrequency);
            self.muted = false;
            self.overtones = (self.params.get(Param::Overtones) * 10.0).round() as i32;
            self.overtone_falloff = self.params.get(Param::OvertoneFalloff);

            self.bitcrush_freq = 1.0 - self.params.get(Param::BitCrush).powf(1.0 / 3.0);
            self.bitcrush_freq_sweep = -self.params.get(Param::BitCrushSweep) * 0.000015;
            self.bitcrush_phase = 0.0;
            self.bitcrush_last = 0.0;

            self.compression_factor =
                1.0 / (1.0 + 4.0 * self.params.get(Param::CompressionAmount));

            let lp_cutoff = self.params.get(Param::LpFilterCutoff);
            let hp_cutoff = self.params.get(Param::HpFilterCutoff);
            self.filters = (lp_cutoff - 1.0).abs() > f32::EPSILON || hp_cutoff != 0.0;

            self.lp_filter_pos = 0.0;
            self.lp_filter_delta_pos = 0.0;
            self.lp_filter_cutoff = lp_cutoff * lp_cutoff * lp_cutoff * 0.1;
            self.lp_filter_delta_cutoff =
                1.0 + self.params.get(Param::LpFilterCutoffSweep) * 0.0001;
            let resonance = self.params.get(Param::LpFilterResonance);
            let mut damping =
                5.0 / (1.0 + resonance * resonance * 20.0) * (0.01 + self.lp_filter_cutoff);
            if damping > 0.8 {
                damping = 0.8;
            }
            self.lp_filter_damping = 1.0 - damping;
            self.lp_filter_on = (lp_cutoff - 1.0).abs() > f32::EPSILON;

            self.hp_filter_pos = 0.0;
            self.hp_filter_cutoff = hp_cutoff * hp_cutoff * 0.1;
            self.hp_filter_delta_cutoff =
                1.0 + self.params.get(Param::HpFilterCutoffSweep) * 0.0003;

            self.vibrato_phase = 0.0;
            let vibrato_speed = self.params.get(Param::VibratoSpeed);
            self.vibrato_speed = vibrato_speed * vibrato_speed * 0.01;
            self.vibrato_amplitude = self.params.get(Param::VibratoDepth) * 0.5;

            let attack = self.params.get(Param::AttackTime);
            let sustain = self.params.get(Param::SustainTime);
            let decay = self.params.get(Param::DecayTime);
            self.envelope_volume = 0.0;
            self.envelope_stage = 0;
            self.envelope_time = 0.0;
            self.envelope_length0 = attack * attack * 100000.0;
            self.envelope_length1 = sustain * sustain * 100000.0;
            self.envelope_length2 = decay * decay * 100000.0 + 10.0;
            self.envelope_length = self.envelope_length0;
            self.envelope_full_length =
                (self.envelope_length0 + self.envelope_length1 + self.envelope_length2) as usize;
            self.envelope_over_length0 = 1.0 / self.envelope_length0;
            self.envelope_over_length1 = 1.0 / self.envelope_length1;
            self.envelope_over_length2 = 1.0 / self.envelope_length2;

            let flanger_offset_slot = self.params.get(Param::FlangerOffset);
            let flanger_sweep = self.params.get(Param::FlangerSweep);
            self.flanger = flanger_offset_slot != 0.0 || flanger_sweep != 0.0;
            self.flanger_offset = flanger_offset_slot * flanger_offset_slot * 1020.0;
            if flanger_offset_slot < 0.0 {
                self.flanger_offset = -self.flanger_offset;
            }
            self.flanger_delta_offset =
                flanger_sweep * flanger_sweep * flanger_sweep * 0.2;
            self.flanger_pos = 0;
            self.flanger_buffer.fill(0.0);

            self.one_bit_noise_state = 1 << 14;
            self.one_bit_noise = 0.0;
            self.buzz_state = 1 << 14;
            self.buzz = 0.0;

            self.pink = PinkNoise::new(rng);
            for n in 0..NOISE_BUFFER_LEN {
                self.noise_buffer[n] = rng.gen::<f32>() * 2.0 - 1.0;
            }
            for n in 0..NOISE_BUFFER_LEN {
                self.pink_noise_buffer[n] = self.pink.next_value(rng);
            }
            for n in 0..NOISE_BUFFER_LEN {
                self.lo_res_noise_buffer[n] = if n % LO_RES_NOISE_PERIOD == 0 {
                    rng.gen::<f32>() * 2.0 - 1.0
                } else {
                    self.lo_res_noise_buffer[n - 1]
                };
            }

            self.repeat_time = 0;
            let repeat_speed = self.params.get(Param::RepeatSpeed);
            self.repeat_limit = if repeat_speed == 0.0 {
                0
            } else {
                ((1.0 - repeat_speed) * (1.0 - repeat_speed) * 20000.0) as i32 + 32
            };
        }

        // The periodic-noise shapes (one-bit and buzz) sound far too low at
        // the bottom of the frequency range, so both frequency controls are
        // folded toward their range midpoints before the period conversion.
        if self.wave_type == Waveform::OneBitNoise as u32
            || self.wave_type == Waveform::Buzz as u32
        {
            let start_min = self.params.min_of(Param::StartFrequency);
            let start_max = self.params.max_of(Param::StartFrequency);
            let start_mid = (start_max + start_min) / 2.0;

            let min_min = self.params.min_of(Param::MinFrequency);
            let min_max = self.params.max_of(Param::MinFrequency);
            let min_mid = (min_max + min_min) / 2.0;

            let delta_start = (start_frequency - start_min) / (start_max - start_min);
            let delta_min = (min_frequency - min_min) / (min_max - min_min);

            let folded_start = start_mid + delta_start / 2.0;
            let folded_min = min_mid + delta_min / 2.0;

            self.period = 100.0 / (folded_start * folded_start + 0.001);
            self.max_period = 100.0 / (folded_min * folded_min + 0.001);
        }
    }

    /// Renders up to `length` samples into `buffer`.
    ///
    /// Returns `Ok(true)` once the envelope has run out; callers streaming
    /// in chunks keep calling until then. Samples are mono `f32` clamped to
    /// [-1, 1].
    pub fn generate(
        &mut self,
        buffer: &mut [f32],
        length: usize,
        sample_rate: u32,
        bit_depth: u32,
        rng: &mut Pcg32,
    ) -> SynthResult<bool> {
        if !SUPPORTED_SAMPLE_RATES.contains(&sample_rate) {
            return Err(SynthError::InvalidSampleRate { rate: sample_rate });
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&bit_depth) {
            return Err(SynthError::UnsupportedFormat {
                bit_depth,
            });
        }

        self.finished = false;

        for out in buffer.iter_mut().take(length) {
            if self.finished {
                return Ok(true);
            }

            // Repeat effect: partially reset the pitch schedule on a timer.
            if self.repeat_limit != 0 {
                self.repeat_time += 1;
                if self.repeat_time >= self.repeat_limit {
                    self.repeat_time = 0;
                    self.reset(false, rng);
                }
            }

            // Pitch-jump window: when it elapses, any applied jumps unwind
            // and both schedules restart.
            self.change_period_time += 1;
            if self.change_period_time as f32 >= self.change_period {
                self.change_time = 0;
                self.change_time2 = 0;
                self.change_period_time = 0;
                if self.change_reached {
                    self.period /= self.change_amount;
                    self.change_reached = false;
                }
                if self.change_reached2 {
                    self.period /= self.change_amount2;
                    self.change_reached2 = false;
                }
            }

            if !self.change_reached {
                self.change_time += 1;
                if self.change_time >= self.change_limit {
                    self.change_reached = true;
                    self.period *= self.change_amount;
                }
            }

            if !self.change_reached2 {
                self.change_time2 += 1;
                if self.change_time2 >= self.change_limit2 {
                    self.period *= self.change_amount2;
                    self.change_reached2 = true;
                }
            }

            self.slide += self.delta_slide;
            self.period *= self.slide;

            // Frequency dropped below the floor; with a min frequency set
            // the rest of the sound is muted.
            if self.period > self.max_period {
                self.period = self.max_period;
                if self.min_frequency > 0.0 {
                    self.muted = true;
                }
            }

            self.period_temp = self.period;
            if self.vibrato_amplitude > 0.0 {
                self.vibrato_phase += self.vibrato_speed;
                self.period_temp =
                    self.period * (1.0 + self.vibrato_phase.sin() * self.vibrato_amplitude);
            }
            self.period_temp = self.period_temp as i32 as f32;
            if self.period_temp < 8.0 {
                self.period_temp = 8.0;
            }

            if self.wave_type == 0 {
                self.square_duty += self.duty_sweep;
                if self.square_duty < 0.0 {
                    self.square_duty = 0.0;
                } else if self.square_duty > 0.5 {
                    self.square_duty = 0.5;
                }
            }

            self.envelope_time += 1.0;
            if self.envelope_time > self.envelope_length {
                self.envelope_time = 0.0;
                self.envelope_stage += 1;
                match self.envelope_stage {
                    1 => self.envelope_length = self.envelope_length1,
                    2 => self.envelope_length = self.envelope_length2,
                    _ => {}
                }
            }

            self.envelope_volume = match self.envelope_stage {
                0 => self.envelope_time * self.envelope_over_length0,
                1 => {
                    1.0 + (1.0 - self.envelope_time * self.envelope_over_length1)
                        * 2.0
                        * self.sustain_punch
                }
                2 => 1.0 - self.envelope_time * self.envelope_over_length2,
                _ => {
                    self.finished = true;
                    0.0
                }
            };

            if self.flanger {
                self.flanger_offset += self.flanger_delta_offset;
                self.flanger_int = self.flanger_offset as i32;
                if self.flanger_int < 0 {
                    self.flanger_int = -self.flanger_int;
                } else if self.flanger_int > 1023 {
                    self.flanger_int = 1023;
                }
            }

            if self.filters && self.hp_filter_delta_cutoff != 0.0 {
                self.hp_filter_cutoff *= self.hp_filter_delta_cutoff;
                if self.hp_filter_cutoff < 0.00001 {
                    self.hp_filter_cutoff = 0.00001;
                } else if self.hp_filter_cutoff > 0.1 {
                    self.hp_filter_cutoff = 0.1;
                }
            }

            let mut super_sample = 0.0f32;
            for _ in 0..SUPERSAMPLES {
                self.phase += 1;
                if self.phase as f32 >= self.period_temp {
                    self.phase -= self.period_temp as i32;
                    self.regenerate_noise(rng);
                }

                let mut sample = 0.0f32;
                let mut overtone_strength = 1.0f32;
                for k in 0..=self.overtones {
                    let temp_phase = ((self.phase * (k + 1)) as f32) % self.period_temp;

                    // The cycling shape resolves to one of the first ten
                    // shapes based on the raw phase, switching every four
                    // steps.
                    let selector = if self.wave_type == Waveform::Cycle as u32 {
                        (self.phase / 4 % 10) as u32
                    } else {
                        self.wave_type
                    };

                    let contribution = match Waveform::from_index(selector) {
                        Some(Waveform::Square) => {
                            if temp_phase / self.period_temp < self.square_duty {
                                0.5
                            } else {
                                -0.5
                            }
                        }
                        Some(Waveform::Saw) => 1.0 - (temp_phase / self.period_temp) * 2.0,
                        Some(Waveform::Sine) => fast_sin(temp_phase / self.period_temp),
                        Some(Waveform::WhiteNoise) => {
                            self.noise_buffer[(temp_phase * 32.0 / self.period_temp) as usize
                                % NOISE_BUFFER_LEN]
                        }
                        Some(Waveform::Triangle) => {
                            (1.0 - (temp_phase / self.period_temp) * 2.0).abs() - 1.0
                        }
                        Some(Waveform::PinkNoise) => {
                            self.pink_noise_buffer[(temp_phase * 32.0 / self.period_temp)
                                as usize
                                % NOISE_BUFFER_LEN]
                        }
                        Some(Waveform::Tangent) => {
                            (std::f32::consts::PI * temp_phase / self.period_temp).tan()
                        }
                        Some(Waveform::Whistle) => {
                            // Fundamental plus a 20x overtone at quarter
                            // amplitude.
                            0.75 * fast_sin(temp_phase / self.period_temp)
                                + 0.25
                                    * fast_sin(
                                        (temp_phase * 20.0) % self.period_temp
                                            / self.period_temp,
                                    )
                        }
                        Some(Waveform::Breaker) => {
                            let amp = temp_phase / self.period_temp;
                            (1.0 - amp * amp * 2.0).abs() - 1.0
                        }
                        Some(Waveform::OneBitNoise) => self.one_bit_noise,
                        Some(Waveform::Buzz) => self.buzz,
                        Some(Waveform::Cycle) | None => 0.0,
                    };
                    sample += overtone_strength * contribution;
                    overtone_strength *= 1.0 - self.overtone_falloff;
                }

                if self.filters {
                    self.lp_filter_old_pos = self.lp_filter_pos;
                    self.lp_filter_cutoff *= self.lp_filter_delta_cutoff;
                    if self.lp_filter_cutoff < 0.0 {
                        self.lp_filter_cutoff = 0.0;
                    } else if self.lp_filter_cutoff > 0.1 {
                        self.lp_filter_cutoff = 0.1;
                    }

                    if self.lp_filter_on {
                        self.lp_filter_delta_pos +=
                            (sample - self.lp_filter_pos) * self.lp_filter_cutoff;
                        self.lp_filter_delta_pos *= self.lp_filter_damping;
                    } else {
                        self.lp_filter_pos = sample;
                        self.lp_filter_delta_pos = 0.0;
                    }
                    self.lp_filter_pos += self.lp_filter_delta_pos;

                    self.hp_filter_pos += self.lp_filter_pos - self.lp_filter_old_pos;
                    self.hp_filter_pos *= 1.0 - self.hp_filter_cutoff;
                    sample = self.hp_filter_pos;
                }

                if self.flanger {
                    self.flanger_buffer[(self.flanger_pos & 1023) as usize] = sample;
                    sample += self.flanger_buffer
                        [((self.flanger_pos - self.flanger_int + 1024) & 1023) as usize];
                    self.flanger_pos = (self.flanger_pos + 1) & 1023;
                }

                super_sample += sample;
            }

            super_sample = super_sample.clamp(-1.0, 1.0);

            // Bit crush: zero-order hold, resampling at bitcrush_freq.
            self.bitcrush_phase += self.bitcrush_freq;
            if self.bitcrush_phase > 1.0 {
                self.bitcrush_phase = 0.0;
                self.bitcrush_last = super_sample;
            }
            self.bitcrush_freq = (self.bitcrush_freq + self.bitcrush_freq_sweep).clamp(0.0, 1.0);
            super_sample = self.bitcrush_last;

            // Odd power-law compressor.
            if super_sample > 0.0 {
                super_sample = super_sample.powf(self.compression_factor);
            } else {
                super_sample = -(-super_sample).powf(self.compression_factor);
            }

            if self.muted {
                super_sample = 0.0;
            }

            *out = super_sample;
        }

        Ok(false)
    }

    /// Refills the noise source for the active wave shape on a period
    /// boundary. Ring-buffer shapes get a fresh buffer; the periodic 1-bit
    /// shapes clock their shift registers by one step.
    fn regenerate_noise(&mut self, rng: &mut Pcg32) {
        match Waveform::from_index(self.wave_type) {
            Some(Waveform::WhiteNoise) => {
                for n in 0..NOISE_BUFFER_LEN {
                    self.noise_buffer[n] = rng.gen::<f32>() * 2.0 - 1.0;
                }
            }
            Some(Waveform::PinkNoise) => {
                for n in 0..NOISE_BUFFER_LEN {
                    self.pink_noise_buffer[n] = self.pink.next_value(rng);
                }
            }
            Some(Waveform::Tangent) => {
                for n in 0..NOISE_BUFFER_LEN {
                    self.lo_res_noise_buffer[n] = if n % LO_RES_NOISE_PERIOD == 0 {
                        rng.gen::<f32>() * 2.0 - 1.0
                    } else {
                        self.lo_res_noise_buffer[n - 1]
                    };
                }
            }
            Some(Waveform::OneBitNoise) => {
                // SN76489-style 15-bit LFSR, taps 0 and 1.
                let feed_bit =
                    (self.one_bit_noise_state >> 1 & 1) ^ (self.one_bit_noise_state & 1);
                self.one_bit_noise_state = self.one_bit_noise_state >> 1 | (feed_bit << 14);
                self.one_bit_noise = (!self.one_bit_noise_state & 1) as f32 - 0.5;
            }
            Some(Waveform::Buzz) => {
                // Same register with taps 0 and 3; not a chip anyone
                // shipped, but it buzzes nicely.
                let feed_bit = (self.buzz_state >> 3 & 1) ^ (self.buzz_state & 1);
                self.buzz_state = self.buzz_state >> 1 | (feed_bit << 14);
                self.buzz = (!self.buzz_state & 1) as f32 - 0.5;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use pretty_assertions::assert_eq;

    fn render(generator: &mut Generator, rng: &mut Pcg32) -> Vec<f32> {
        generator.reset(true, rng);
        let mut buffer = vec![0.0f32; generator.sample_count()];
        let count = buffer.len();
        generator
            .generate(&mut buffer, count, 44100, 16, rng)
            .unwrap();
        buffer
    }

    #[test]
    fn test_total_length_floor_scales_all_three_stages() {
        let mut generator = Generator::new();
        generator.params_mut().set(Param::AttackTime, 0.01);
        generator.params_mut().set(Param::SustainTime, 0.01);
        generator.params_mut().set(Param::DecayTime, 0.01);

        let mut rng = create_rng(1);
        generator.reset(true, &mut rng);

        let attack = generator.params().get(Param::AttackTime);
        let sustain = generator.params().get(Param::SustainTime);
        let decay = generator.params().get(Param::DecayTime);
        assert!((attack + sustain + decay - MIN_LENGTH).abs() < 1e-5);
        assert!((attack - 0.06).abs() < 1e-5);
        assert!((sustain - 0.06).abs() < 1e-5);
        assert!((decay - 0.06).abs() < 1e-5);
    }

    #[test]
    fn test_sustain_floor_written_back() {
        let mut generator = Generator::new();
        generator.params_mut().set(Param::SustainTime, 0.001);
        generator.params_mut().set(Param::AttackTime, 0.5);
        generator.params_mut().set(Param::DecayTime, 0.5);

        let mut rng = create_rng(1);
        generator.reset(true, &mut rng);

        assert_eq!(generator.params().get(Param::SustainTime), 0.01);
    }

    #[test]
    fn test_sample_count_matches_envelope_lengths() {
        let mut generator = Generator::new();
        generator.params_mut().set(Param::AttackTime, 0.1);
        generator.params_mut().set(Param::SustainTime, 0.2);
        generator.params_mut().set(Param::DecayTime, 0.3);

        let mut rng = create_rng(1);
        generator.reset(true, &mut rng);

        let expected =
            (0.1f32 * 0.1 * 100000.0 + 0.2f32 * 0.2 * 100000.0 + 0.3f32 * 0.3 * 100000.0 + 10.0)
                as usize;
        assert_eq!(generator.sample_count(), expected);
    }

    #[test]
    fn test_samples_stay_in_range() {
        for seed in [1u32, 17, 255, 90210] {
            let mut generator = Generator::new();
            generator.params_mut().set(Param::WaveType, 3.0);
            generator.params_mut().set(Param::SustainPunch, 1.0);
            let mut rng = create_rng(seed);
            let buffer = render(&mut generator, &mut rng);
            assert!(!buffer.is_empty());
            for sample in buffer {
                assert!((-1.0..=1.0).contains(&sample), "seed {seed}: {sample}");
            }
        }
    }

    #[test]
    fn test_sustain_punch_raises_envelope_above_unity() {
        let mut generator = Generator::new();
        generator.params_mut().set(Param::AttackTime, 0.0);
        generator.params_mut().set(Param::SustainTime, 0.3);
        generator.params_mut().set(Param::DecayTime, 0.3);
        generator.params_mut().set(Param::SustainPunch, 1.0);

        let mut rng = create_rng(1);
        generator.reset(true, &mut rng);

        let mut buffer = [0.0f32; 1];
        generator
            .generate(&mut buffer, 1, 44100, 16, &mut rng)
            .unwrap();

        // With no attack the first sample is the start of sustain, where
        // full punch triples the envelope gain.
        assert_eq!(generator.envelope_volume(), 3.0);
    }

    #[test]
    fn test_generate_rejects_bad_formats() {
        let mut generator = Generator::new();
        let mut rng = create_rng(1);
        generator.reset(true, &mut rng);
        let mut buffer = [0.0f32; 16];

        let err = generator
            .generate(&mut buffer, 16, 11025, 16, &mut rng)
            .unwrap_err();
        assert!(matches!(err, SynthError::InvalidSampleRate { rate: 11025 }));

        let err = generator
            .generate(&mut buffer, 16, 44100, 12, &mut rng)
            .unwrap_err();
        assert!(matches!(err, SynthError::UnsupportedFormat { bit_depth: 12 }));
    }

    #[test]
    fn test_generate_reports_finished() {
        let mut generator = Generator::new();
        let mut rng = create_rng(5);
        generator.reset(true, &mut rng);

        let total = generator.sample_count();
        let mut buffer = vec![0.0f32; total + 64];
        let len = buffer.len();
        let finished = generator
            .generate(&mut buffer, len, 44100, 16, &mut rng)
            .unwrap();
        assert!(finished);
    }

    #[test]
    fn test_identical_state_renders_identical_audio() {
        let mut generator1 = Generator::new();
        generator1.params_mut().set(Param::WaveType, 5.0);
        generator1.params_mut().set(Param::VibratoDepth, 0.4);
        let mut rng1 = create_rng(777);

        let mut generator2 = Generator::new();
        generator2.params_mut().set(Param::WaveType, 5.0);
        generator2.params_mut().set(Param::VibratoDepth, 0.4);
        let mut rng2 = create_rng(777);

        assert_eq!(
            render(&mut generator1, &mut rng1),
            render(&mut generator2, &mut rng2)
        );
    }

    #[test]
    fn test_min_frequency_mutes_tail() {
        let mut generator = Generator::new();
        generator.params_mut().set(Param::StartFrequency, 0.3);
        generator.params_mut().set(Param::MinFrequency, 0.29);
        generator.params_mut().set(Param::Slide, -1.0);
        generator.params_mut().set(Param::SustainTime, 1.0);
        generator.params_mut().set(Param::DecayTime, 0.5);

        let mut rng = create_rng(3);
        let buffer = render(&mut generator, &mut rng);

        // A hard downward slide hits the frequency floor quickly, muting
        // the remainder of the clip.
        let tail = &buffer[buffer.len() / 2..];
        assert!(tail.iter().all(|&s| s == 0.0));
    }
}
