//! Procedural melody synthesis.
//!
//! A melody is rendered in five passes over one call-local buffer:
//!
//! 1. one note per beat, drawn from a fixed five-note interval set across
//!    three octaves, rendered as three additive harmonics under an
//!    attack/sustain/release envelope,
//! 2. a tempo-locked kick layer,
//! 3. a two-tap delay reverb,
//! 4. a zero-phase 4th-order Butterworth lowpass at 8 kHz,
//! 5. peak normalization to `f32`.
//!
//! Notes are spaced evenly across the whole duration while kicks follow the
//! beat period, so the two layers drift apart when the duration is not a
//! whole number of beats.

use std::f64::consts::PI;

use memetune_spec::{validate_timing, GenerationConfig, Genre};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::envelope::{note_envelope, note_ramp_lengths};
use crate::error::AudioResult;
use crate::filter::ButterworthLowpass;
use crate::normalize::normalize_peak;
use crate::percussion::add_kicks;
use crate::reverb::apply_reverb;
use crate::rng::create_rng;
use crate::waveform::Waveform;

/// Semitone intervals a note can take within one octave.
pub const INTERVALS: [u32; 5] = [0, 2, 4, 7, 9];

/// Number of octaves a note can be shifted up by (0, 1 or 2).
pub const OCTAVE_SPAN: u32 = 3;

/// `(multiple of the fundamental, amplitude)` of each partial.
pub const HARMONICS: [(f64, f64); 3] = [(1.0, 0.8), (2.0, 0.3), (3.0, 0.15)];

/// Lowpass cutoff in Hz.
pub const LOWPASS_CUTOFF_HZ: f64 = 8000.0;

/// Lowpass order.
pub const LOWPASS_ORDER: usize = 4;

/// One melody note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Semitones above the genre base frequency.
    pub semitone: u32,
    /// Start time in seconds.
    pub start_seconds: f64,
}

impl Note {
    /// Note frequency in Hz for a base frequency.
    pub fn frequency(&self, base_frequency: f64) -> f64 {
        base_frequency * 2f64.powf(self.semitone as f64 / 12.0)
    }
}

/// Melody synthesizer for one set of timing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MelodySynth {
    tempo_bpm: f64,
    duration_seconds: f64,
    genre: Genre,
    sample_rate: u32,
}

impl MelodySynth {
    /// Creates a synthesizer, rejecting parameters that cannot be rendered.
    ///
    /// # Arguments
    /// * `tempo_bpm` - Tempo in beats per minute, positive
    /// * `duration_seconds` - Length of the output, positive
    /// * `genre` - Genre, selects the base frequency
    /// * `sample_rate` - Output sample rate in Hz, positive
    pub fn new(
        tempo_bpm: f64,
        duration_seconds: f64,
        genre: Genre,
        sample_rate: u32,
    ) -> AudioResult<Self> {
        validate_timing(tempo_bpm, duration_seconds, sample_rate)?;
        Ok(Self {
            tempo_bpm,
            duration_seconds,
            genre,
            sample_rate,
        })
    }

    /// Creates a synthesizer from a generation config.
    pub fn from_config(config: &GenerationConfig) -> AudioResult<Self> {
        Self::new(
            config.tempo_bpm,
            config.duration_seconds,
            config.genre.clone(),
            config.sample_rate,
        )
    }

    /// Number of output samples, `round(sample_rate * duration)`.
    pub fn num_samples(&self) -> usize {
        (self.sample_rate as f64 * self.duration_seconds).round() as usize
    }

    /// Number of melody notes, `ceil(duration * tempo / 60)`.
    pub fn beat_count(&self) -> usize {
        (self.duration_seconds * (self.tempo_bpm / 60.0)).ceil() as usize
    }

    /// One beat in whole samples.
    pub fn beat_period_samples(&self) -> usize {
        (self.sample_rate as f64 * (60.0 / self.tempo_bpm)) as usize
    }

    /// Base frequency of the genre in Hz.
    pub fn base_frequency(&self) -> f64 {
        self.genre.base_frequency()
    }

    /// Draws the notes of the melody.
    ///
    /// Per beat, an interval is drawn from [`INTERVALS`] and then an octave
    /// from `0..OCTAVE_SPAN`. Beat `k` starts at `k * duration / beats`.
    ///
    /// A tempo so high that one beat is shorter than a sample yields no
    /// notes. Otherwise there are at most as many notes as output samples.
    pub fn compose(&self, rng: &mut Pcg32) -> Vec<Note> {
        if self.beat_period_samples() == 0 {
            return Vec::new();
        }
        let beats = self.beat_count();
        (0..beats)
            .map(|k| {
                let interval = INTERVALS[rng.gen_range(0..INTERVALS.len())];
                let octave = rng.gen_range(0..OCTAVE_SPAN);
                Note {
                    semitone: interval + 12 * octave,
                    start_seconds: k as f64 * self.duration_seconds / beats as f64,
                }
            })
            .collect()
    }

    /// Renders the melody for a seed.
    pub fn render(&self, seed: u32) -> Waveform {
        let sample_rate = self.sample_rate as f64;
        let num_samples = self.num_samples();
        let mut rng = create_rng(seed);
        let mut buffer = vec![0.0_f64; num_samples];

        let notes = self.compose(&mut rng);
        let base = self.base_frequency();
        let span = self.beat_period_samples();
        let (attack, release) = note_ramp_lengths(sample_rate);
        log::debug!(
            "melody: {} notes, base {} Hz, {} samples per beat, {} samples",
            notes.len(),
            base,
            span,
            num_samples
        );

        for note in &notes {
            let start = (note.start_seconds * sample_rate) as usize;
            let end = num_samples.min(start + span);
            if end <= start {
                continue;
            }
            let envelope = note_envelope(end - start, attack, release);
            add_tone(
                &mut buffer[start..end],
                start,
                note.frequency(base),
                sample_rate,
                &envelope,
            );
        }

        add_kicks(&mut buffer, sample_rate, span, &mut rng);
        apply_reverb(&mut buffer, sample_rate);
        let buffer = apply_lowpass(buffer, sample_rate);

        Waveform::new(normalize_peak(&buffer), self.sample_rate)
    }
}

/// Adds the harmonic tone of one note to `segment`.
///
/// `offset` is the absolute sample index of `segment[0]`, so every note's
/// phase follows the global time axis.
fn add_tone(segment: &mut [f64], offset: usize, frequency: f64, sample_rate: f64, envelope: &[f64]) {
    for (i, (sample, env)) in segment.iter_mut().zip(envelope).enumerate() {
        let t = (offset + i) as f64 / sample_rate;
        let tone: f64 = HARMONICS
            .iter()
            .map(|&(multiple, amplitude)| amplitude * (2.0 * PI * frequency * multiple * t).sin())
            .sum();
        *sample += tone * env;
    }
}

/// Applies the zero-phase lowpass, or returns the input unchanged if the
/// filter cannot be built or applied for these parameters.
pub fn apply_lowpass(buffer: Vec<f64>, sample_rate: f64) -> Vec<f64> {
    let filtered = ButterworthLowpass::new(LOWPASS_ORDER, LOWPASS_CUTOFF_HZ, sample_rate)
        .and_then(|filter| filter.filtfilt(&buffer));
    match filtered {
        Ok(filtered) => filtered,
        Err(err) => {
            log::debug!("lowpass skipped: {}", err);
            buffer
        }
    }
}

/// Synthesizes an instrumental melody.
///
/// The prompt does not influence the content; all variation comes from the
/// seed. Output length is `round(sample_rate * duration_seconds)` and every
/// sample lies in [-1.0, 1.0].
///
/// # Example
/// ```
/// use memetune_backend_audio::synth_melody;
/// use memetune_spec::Genre;
///
/// let wave = synth_melody("x", 100.0, 5.0, &Genre::Electronic, 22050, 42).unwrap();
/// assert_eq!(wave.len(), 110_250);
/// ```
pub fn synth_melody(
    prompt: &str,
    tempo_bpm: f64,
    duration_seconds: f64,
    genre: &Genre,
    sample_rate: u32,
    seed: u32,
) -> AudioResult<Waveform> {
    log::debug!("melody prompt {:?} genre {} seed {}", prompt, genre, seed);
    let synth = MelodySynth::new(tempo_bpm, duration_seconds, genre.clone(), sample_rate)?;
    Ok(synth.render(seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudioError;

    #[test]
    fn test_beat_arithmetic() {
        let synth = MelodySynth::new(100.0, 5.0, Genre::Electronic, 22050).unwrap();
        assert_eq!(synth.num_samples(), 110_250);
        // 5 s at 100 BPM is 8.33 beats
        assert_eq!(synth.beat_count(), 9);
        assert_eq!(synth.beat_period_samples(), 13_230);
    }

    #[test]
    fn test_notes_evenly_spaced_across_duration() {
        let synth = MelodySynth::new(120.0, 3.0, Genre::Pop, 22050).unwrap();
        let notes = synth.compose(&mut create_rng(3));
        assert_eq!(notes.len(), 6);
        for (k, note) in notes.iter().enumerate() {
            assert!((note.start_seconds - k as f64 * 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_notes_use_interval_set() {
        let synth = MelodySynth::new(600.0, 10.0, Genre::Pop, 8000).unwrap();
        let notes = synth.compose(&mut create_rng(11));
        assert_eq!(notes.len(), 100);
        for note in &notes {
            assert!(note.semitone < 36);
            assert!(INTERVALS.contains(&(note.semitone % 12)));
        }
        // Across 100 draws every octave shows up
        for octave in 0..OCTAVE_SPAN {
            assert!(notes.iter().any(|n| n.semitone / 12 == octave));
        }
    }

    #[test]
    fn test_note_frequency() {
        let note = Note {
            semitone: 12,
            start_seconds: 0.0,
        };
        assert!((note.frequency(55.0) - 110.0).abs() < 1e-9);
        let note = Note {
            semitone: 7,
            start_seconds: 0.0,
        };
        assert!((note.frequency(65.0) - 65.0 * 2f64.powf(7.0 / 12.0)).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_timing() {
        assert!(matches!(
            MelodySynth::new(0.0, 5.0, Genre::Pop, 22050),
            Err(AudioError::InvalidConfig(_))
        ));
        assert!(MelodySynth::new(100.0, -1.0, Genre::Pop, 22050).is_err());
        assert!(MelodySynth::new(100.0, 1.0, Genre::Pop, 0).is_err());
    }

    #[test]
    fn test_sub_sample_beat_renders_silence() {
        let synth = MelodySynth::new(1e300, 1.0, Genre::Pop, 22050).unwrap();
        assert_eq!(synth.beat_period_samples(), 0);
        assert!(synth.compose(&mut create_rng(1)).is_empty());

        let wave = synth_melody("x", 1e300, 1.0, &Genre::Pop, 22050, 1).unwrap();
        assert_eq!(wave.len(), 22050);
        assert!(wave.samples().iter().all(|&s| s == 0.0));

        // Just under one sample per beat
        let wave = synth_melody("x", 60.0 * 8000.0 * 1.5, 0.5, &Genre::Pop, 8000, 1).unwrap();
        assert_eq!(wave.len(), 4000);
    }

    #[test]
    fn test_lowpass_fallback_when_cutoff_above_nyquist() {
        let input: Vec<f64> = (0..1000).map(|i| ((i * 7919) % 13) as f64 - 6.0).collect();
        // 8 kHz is the Nyquist frequency at 16 kHz
        assert_eq!(apply_lowpass(input.clone(), 16000.0), input);
        // And a real filter changes the signal
        assert_ne!(apply_lowpass(input.clone(), 44100.0), input);
    }

    #[test]
    fn test_lowpass_fallback_for_tiny_buffers() {
        let input = vec![0.25, -0.5, 1.0];
        assert_eq!(apply_lowpass(input.clone(), 22050.0), input);
    }
}
