use super::audio_config::SceneAudioConfig;
use super::constants::{GRAIN_ATTACK_FRAC, GRAIN_JITTER, GRAIN_RELEASE_FRAC, MIN_GRAIN_INTERVAL_MS};
use rand::prelude::*;

/// Trapezoidal gain envelope: linear attack, flat sustain, linear release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub attack: f64,
    pub sustain: f64,
    pub release: f64,
    pub peak: f32,
}

impl Envelope {
    pub fn trapezoid(duration_sec: f64, peak: f32) -> Self {
        let d = duration_sec.max(0.0);
        let attack = d * GRAIN_ATTACK_FRAC as f64;
        let release = d * GRAIN_RELEASE_FRAC as f64;
        Self {
            attack,
            sustain: (d - attack - release).max(0.0),
            release,
            peak,
        }
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.attack + self.sustain + self.release
    }

    pub fn gain_at(&self, t: f64) -> f32 {
        if t <= 0.0 || t >= self.duration() {
            return 0.0;
        }
        if t < self.attack {
            return self.peak * (t / self.attack) as f32;
        }
        let release_start = self.attack + self.sustain;
        if t <= release_start {
            return self.peak;
        }
        self.peak * (1.0 - (t - release_start) / self.release) as f32
    }
}

/// Everything needed to play one grain; read from the active config at spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrainSpec {
    /// Playback rate applied to the noise buffer.
    pub pitch: f32,
    /// Start offset into the shared buffer, seconds.
    pub offset_sec: f64,
    pub pan: f32,
    pub envelope: Envelope,
}

/// Hard left below the pitch midpoint, hard right at or above it.
#[inline]
pub fn split_pan(pitch: f32, config: &SceneAudioConfig) -> f32 {
    if pitch < config.pitch_mid() {
        -1.0
    } else {
        1.0
    }
}

pub fn plan_grain(
    config: &SceneAudioConfig,
    decision_split: bool,
    buffer_seconds: f64,
    rng: &mut StdRng,
) -> GrainSpec {
    let (lo, hi) = if config.pitch_max > config.pitch_min {
        (config.pitch_min, config.pitch_max)
    } else {
        (config.pitch_max, config.pitch_min)
    };
    let pitch = if hi > lo { rng.gen_range(lo..hi) } else { lo };
    let envelope = Envelope::trapezoid(config.grain_ms.max(1.0) as f64 / 1000.0, config.amplitude);
    // The source reads duration * pitch seconds of buffer.
    let consumed = envelope.duration() * pitch as f64;
    let room = (buffer_seconds - consumed).max(0.0);
    let offset_sec = if room > 0.0 { rng.gen_range(0.0..room) } else { 0.0 };
    let pan = if decision_split {
        split_pan(pitch, config)
    } else {
        let spread = config.pan_spread.clamp(0.0, 1.0);
        if spread > 0.0 {
            rng.gen_range(-spread..=spread)
        } else {
            0.0
        }
    };
    GrainSpec {
        pitch,
        offset_sec,
        pan,
        envelope,
    }
}

/// Delay before the next grain: `1000/density` ms with +-30% jitter.
pub fn next_interval_ms(density: f32, rng: &mut StdRng) -> f64 {
    let base = 1000.0 / density.max(0.1) as f64;
    let jitter = rng.gen_range(-GRAIN_JITTER..=GRAIN_JITTER);
    (base * (1.0 + jitter)).max(MIN_GRAIN_INTERVAL_MS)
}

/// xorshift32 step mapped to [-1, 1].
#[inline]
fn xorshift_sample(state: &mut u32) -> f32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    (x as f32 / u32::MAX as f32) * 2.0 - 1.0
}

/// Deterministic white noise shared by every grain.
pub fn noise_buffer(len: usize, seed: u32) -> Vec<f32> {
    let mut s = seed.max(1);
    (0..len).map(|_| xorshift_sample(&mut s)).collect()
}

/// Stereo reverb tail: decaying noise with a darkening tilt.
pub fn impulse_response(sample_rate: f32, seconds: f32) -> [Vec<f32>; 2] {
    let len = (sample_rate * seconds).max(1.0) as usize;
    let dt = 1.0 / sample_rate;
    let decay_tau = seconds / 3.0;
    let seeds = [0x1234_ABCDu32, 0x7890_FEDCu32];
    seeds.map(|seed| {
        let mut s = seed;
        (0..len)
            .map(|i| {
                let t = i as f32 * dt;
                let n = xorshift_sample(&mut s);
                let decay = (-t / decay_tau).exp();
                let dark = (1.0 - t / seconds).max(0.0);
                n * decay * (0.6 + 0.4 * dark)
            })
            .collect()
    })
}
