//! Tempo-locked kick layer.

use std::f64::consts::PI;

use rand_pcg::Pcg32;

use crate::envelope::exp_decay;
use crate::rng::standard_normal;

/// Maximum kick length in samples.
pub const KICK_LENGTH: usize = 800;

/// Kick body frequency in Hz.
pub const KICK_FREQUENCY: f64 = 60.0;

const BODY_GAIN: f64 = 0.6;
const BODY_DECAY: f64 = 3.0;
const NOISE_GAIN: f64 = 0.3;
const NOISE_DECAY: f64 = 5.0;

/// Adds a decaying kick at every multiple of `beat_period` samples.
///
/// Each kick is a 60 Hz sine under an exponential decay plus a quieter,
/// faster-decaying burst of Gaussian noise drawn from `rng`. Kicks are cut
/// off at the end of the buffer. A zero beat period adds nothing.
///
/// # Arguments
/// * `buffer` - Output buffer, accumulated into
/// * `sample_rate` - Audio sample rate in Hz
/// * `beat_period` - Distance between kicks in samples
/// * `rng` - Call-local RNG for the noise burst
pub fn add_kicks(buffer: &mut [f64], sample_rate: f64, beat_period: usize, rng: &mut Pcg32) {
    if beat_period == 0 {
        return;
    }

    let len = buffer.len();
    for start in (0..len).step_by(beat_period) {
        let length = KICK_LENGTH.min(len - start);
        let body_env = exp_decay(BODY_DECAY, length);
        let noise_env = exp_decay(NOISE_DECAY, length);

        for j in 0..length {
            let t = (start + j) as f64 / sample_rate;
            let body = BODY_GAIN * (2.0 * PI * KICK_FREQUENCY * t).sin() * body_env[j];
            let noise = NOISE_GAIN * standard_normal(rng) * noise_env[j];
            buffer[start + j] += body + noise;
        }
    }
}
