//! Finished mono waveform.

/// A mono single-precision waveform paired with its sample rate.
///
/// Waveforms produced by this crate are peak-normalized, so every sample
/// lies in [-1.0, 1.0]. Once built, the samples are only exposed by shared
/// reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Creates a waveform from samples and a sample rate in Hz.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Returns the samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }

    /// Returns a copy holding at most the first `max_samples` samples.
    pub fn truncated(&self, max_samples: usize) -> Self {
        let end = max_samples.min(self.samples.len());
        Self::new(self.samples[..end].to_vec(), self.sample_rate)
    }
}
