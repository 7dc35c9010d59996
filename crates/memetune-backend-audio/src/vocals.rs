//! Vocal modulation of synthesized speech.
//!
//! Speech from a [`SpeechEngine`] is downmixed to mono, given a slow 5 Hz
//! amplitude wobble that reads as a sung vibrato, resampled to the target
//! rate and peak-normalized. The wobble is an amplitude-domain
//! approximation; there is no pitch shifting or formant work.

use std::f64::consts::PI;

use memetune_spec::ConfigError;

use crate::capability::{RawSpeech, SpeechEngine};
use crate::error::{AudioError, AudioResult, Capability};
use crate::normalize::normalize_peak;
use crate::resample::{resample_fft, resampled_len};
use crate::waveform::Waveform;

/// Vibrato rate in Hz.
pub const VIBRATO_RATE_HZ: f64 = 5.0;

/// Vibrato depth as a fraction of the signal amplitude.
pub const VIBRATO_DEPTH: f64 = 0.02;

/// Turns lyrics into a sung waveform at `target_sample_rate`.
///
/// Fails with [`AudioError::CapabilityUnavailable`] without calling the
/// engine when it reports itself unavailable. The returned waveform's
/// sample rate is the effective output rate.
pub fn synth_vocals(
    engine: &dyn SpeechEngine,
    lyrics: &str,
    target_sample_rate: u32,
) -> AudioResult<Waveform> {
    if !engine.is_available() {
        return Err(AudioError::unavailable(
            Capability::Speech,
            format!("speech engine '{}' is not available", engine.name()),
        ));
    }
    if target_sample_rate == 0 {
        return Err(ConfigError::InvalidSampleRate { rate: 0 }.into());
    }

    let raw = engine.synthesize(lyrics)?;
    log::debug!(
        "speech from '{}': {} channel(s), {} frames at {} Hz",
        engine.name(),
        raw.channels.len(),
        raw.frames(),
        raw.sample_rate
    );
    modulate_speech(&raw, target_sample_rate)
}

/// Applies the vocal treatment to raw speech.
pub fn modulate_speech(raw: &RawSpeech, target_sample_rate: u32) -> AudioResult<Waveform> {
    if target_sample_rate == 0 {
        return Err(ConfigError::InvalidSampleRate { rate: 0 }.into());
    }
    if raw.sample_rate == 0 {
        return Err(AudioError::synthesis("speech has a sample rate of 0 Hz"));
    }
    if raw.channels.is_empty() || raw.frames() == 0 {
        return Err(AudioError::synthesis("speech engine produced no audio"));
    }

    let mut mono = downmix(&raw.channels);
    apply_vibrato(&mut mono, raw.sample_rate as f64);

    let num = resampled_len(mono.len(), raw.sample_rate, target_sample_rate);
    let resampled = resample_fft(&mono, num);

    Ok(Waveform::new(normalize_peak(&resampled), target_sample_rate))
}

/// Averages channels into one. A single channel is returned as-is.
pub fn downmix(channels: &[Vec<f32>]) -> Vec<f64> {
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    let count = channels.len() as f64;
    (0..frames)
        .map(|i| channels.iter().map(|c| c[i] as f64).sum::<f64>() / count)
        .collect()
}

/// Multiplies by `1 + depth * sin(2π * rate * t)`.
pub fn apply_vibrato(samples: &mut [f64], sample_rate: f64) {
    for (i, sample) in samples.iter_mut().enumerate() {
        let t = i as f64 / sample_rate;
        *sample *= 1.0 + VIBRATO_DEPTH * (2.0 * PI * VIBRATO_RATE_HZ * t).sin();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::NoSpeech;

    #[test]
    fn test_downmix_averages() {
        let mono = downmix(&[vec![1.0, 0.0, 0.5], vec![0.0, 1.0, -0.5]]);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_vibrato_depth() {
        let mut samples = vec![1.0; 1000];
        apply_vibrato(&mut samples, 1000.0);
        let max = samples.iter().cloned().fold(f64::MIN, f64::max);
        let min = samples.iter().cloned().fold(f64::MAX, f64::min);
        assert!((max - 1.02).abs() < 1e-4);
        assert!((min - 0.98).abs() < 1e-4);
        assert_eq!(samples[0], 1.0);
    }

    #[test]
    fn test_unavailable_engine() {
        let err = synth_vocals(&NoSpeech, "hello", 22050).unwrap_err();
        assert!(err.is_capability_unavailable());
    }

    #[test]
    fn test_empty_speech_is_an_error() {
        let raw = RawSpeech::mono(Vec::new(), 16000);
        assert!(matches!(
            modulate_speech(&raw, 22050),
            Err(AudioError::Synthesis { .. })
        ));
        let raw = RawSpeech {
            channels: Vec::new(),
            sample_rate: 16000,
        };
        assert!(modulate_speech(&raw, 22050).is_err());
    }

    #[test]
    fn test_zero_rates_rejected() {
        let raw = RawSpeech::mono(vec![0.1; 10], 0);
        assert!(modulate_speech(&raw, 22050).is_err());
        let raw = RawSpeech::mono(vec![0.1; 10], 16000);
        assert!(matches!(
            modulate_speech(&raw, 0),
            Err(AudioError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_modulated_output_shape() {
        let samples: Vec<f32> = (0..16000)
            .map(|i| (2.0 * PI * 220.0 * i as f64 / 16000.0).sin() as f32 * 0.3)
            .collect();
        let raw = RawSpeech::mono(samples, 16000);
        let wave = modulate_speech(&raw, 22050).unwrap();
        assert_eq!(wave.sample_rate(), 22050);
        assert_eq!(wave.len(), 22050);
        assert!(wave.peak() <= 1.0);
        assert!(wave.peak() > 0.99);
    }
}
