//! Butterworth lowpass built from biquad sections.
//!
//! An even-order Butterworth lowpass is realized as a cascade of second
//! order sections whose Q values come from the Butterworth pole angles.
//! Coefficients use the Audio EQ Cookbook lowpass formula, which is the
//! bilinear transform with frequency prewarping, so the digital response
//! matches a classic prewarped Butterworth design.
//!
//! [`ButterworthLowpass::filtfilt`] runs the cascade forward and then
//! backward over the signal for a zero-phase result.

use std::f64::consts::PI;

use thiserror::Error;

/// Reasons a filter cannot be built or applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Normalized cutoff outside the open interval (0, 1).
    #[error("cutoff {cutoff} Hz is outside (0, {nyquist}) Hz")]
    CutoffOutOfRange {
        /// Requested cutoff in Hz.
        cutoff: f64,
        /// Nyquist frequency in Hz.
        nyquist: f64,
    },

    /// Order is zero or odd.
    #[error("unsupported filter order {0} (must be even and non-zero)")]
    UnsupportedOrder(usize),

    /// Signal is too short for the edge padding.
    #[error("signal of {len} samples is too short, need more than {padlen}")]
    SignalTooShort {
        /// Signal length.
        len: usize,
        /// Required padding length.
        padlen: usize,
    },

    /// Filtering produced NaN or infinity.
    #[error("filter output is not finite")]
    NonFinite,
}

/// Biquad filter coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Creates lowpass filter coefficients.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz
    /// * `q` - Q factor, 0.707 is a single Butterworth section
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn lowpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let omega = 2.0 * PI * cutoff / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        let b2 = (1.0 - cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Gain at DC, `H(z = 1)`.
    pub fn dc_gain(&self) -> f64 {
        (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2)
    }
}

/// Biquad filter state (direct form I).
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    coeffs: BiquadCoeffs,
    // Delay line for input samples
    x1: f64,
    x2: f64,
    // Delay line for output samples
    y1: f64,
    y2: f64,
}

impl BiquadFilter {
    /// Creates a new biquad filter with the given coefficients.
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Primes the delay lines with the steady state reached after a constant
    /// input of `value`, so a signal starting at `value` has no transient.
    pub fn settle(&mut self, value: f64) {
        let out = self.coeffs.dc_gain() * value;
        self.x1 = value;
        self.x2 = value;
        self.y1 = out;
        self.y2 = out;
    }

    /// Processes a single sample through the filter.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.coeffs.b0 * input + self.coeffs.b1 * self.x1 + self.coeffs.b2 * self.x2
            - self.coeffs.a1 * self.y1
            - self.coeffs.a2 * self.y2;

        // Update delay lines
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Processes a buffer of samples in place.
    pub fn process_buffer(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

/// Even-order Butterworth lowpass as a cascade of biquads.
#[derive(Debug, Clone)]
pub struct ButterworthLowpass {
    sections: Vec<BiquadCoeffs>,
}

impl ButterworthLowpass {
    /// Designs the filter.
    ///
    /// # Arguments
    /// * `order` - Filter order, even and non-zero
    /// * `cutoff` - Cutoff frequency in Hz, strictly below Nyquist
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn new(order: usize, cutoff: f64, sample_rate: f64) -> Result<Self, FilterError> {
        if order == 0 || order % 2 != 0 {
            return Err(FilterError::UnsupportedOrder(order));
        }
        let nyquist = sample_rate / 2.0;
        let normalized = cutoff / nyquist;
        if !(normalized > 0.0 && normalized < 1.0) {
            return Err(FilterError::CutoffOutOfRange { cutoff, nyquist });
        }

        let sections = (0..order / 2)
            .map(|k| {
                let angle = PI * (2 * k + 1) as f64 / (2 * order) as f64;
                let q = 1.0 / (2.0 * angle.cos());
                BiquadCoeffs::lowpass(cutoff, q, sample_rate)
            })
            .collect();

        Ok(Self { sections })
    }

    /// Number of edge samples reflected on each side by [`filtfilt`].
    ///
    /// Three times the length of the equivalent transfer-function
    /// numerator, i.e. `3 * (order + 1)`.
    ///
    /// [`filtfilt`]: ButterworthLowpass::filtfilt
    pub fn padlen(&self) -> usize {
        3 * (2 * self.sections.len() + 1)
    }

    /// Filters the signal once, forward, from a steady state at `input[0]`.
    fn run(&self, input: &mut [f64]) {
        let Some(&first) = input.first() else {
            return;
        };
        let mut level = first;
        for coeffs in &self.sections {
            let mut section = BiquadFilter::new(*coeffs);
            section.settle(level);
            level *= coeffs.dc_gain();
            section.process_buffer(input);
        }
    }

    /// Applies the filter forward and backward for zero phase distortion.
    ///
    /// The signal is extended at both ends by odd reflection over
    /// [`padlen`](ButterworthLowpass::padlen) samples, and each pass starts
    /// from the steady state of its first sample, which keeps the edges free
    /// of start-up transients.
    pub fn filtfilt(&self, input: &[f64]) -> Result<Vec<f64>, FilterError> {
        let len = input.len();
        let padlen = self.padlen();
        if len <= padlen {
            return Err(FilterError::SignalTooShort { len, padlen });
        }

        let first = input[0];
        let last = input[len - 1];
        let mut ext = Vec::with_capacity(len + 2 * padlen);
        ext.extend((1..=padlen).rev().map(|i| 2.0 * first - input[i]));
        ext.extend_from_slice(input);
        ext.extend((1..=padlen).map(|i| 2.0 * last - input[len - 1 - i]));

        self.run(&mut ext);
        ext.reverse();
        self.run(&mut ext);
        ext.reverse();

        let out = ext[padlen..padlen + len].to_vec();
        if out.iter().any(|s| !s.is_finite()) {
            return Err(FilterError::NonFinite);
        }
        Ok(out)
    }
}
