//! Frequency-domain resampling.
//!
//! The whole signal is transformed with one FFT, the spectrum is truncated
//! (downsampling) or zero-padded (upsampling) to the target length, and an
//! inverse FFT produces the resampled signal. The signal is treated as
//! periodic, which is exact for band-limited periodic input and good enough
//! for speech.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Output length for converting `len` samples between two rates:
/// `round(len * to_rate / from_rate)`.
pub fn resampled_len(len: usize, from_rate: u32, to_rate: u32) -> usize {
    if from_rate == 0 {
        return 0;
    }
    (len as f64 * to_rate as f64 / from_rate as f64).round() as usize
}

/// Resamples `input` to exactly `num` samples.
///
/// When the shorter of the two lengths is even, its Nyquist bin is shared
/// between the positive and negative halves of the spectrum: it is doubled
/// when folding down and halved when spreading up, so the real signal keeps
/// its energy at that frequency.
pub fn resample_fft(input: &[f64], num: usize) -> Vec<f64> {
    let len = input.len();
    if len == 0 || num == 0 {
        return vec![0.0; num];
    }
    if len == num {
        return input.to_vec();
    }

    let mut planner = FftPlanner::<f64>::new();

    let mut spectrum: Vec<Complex<f64>> = input.iter().map(|&s| Complex::new(s, 0.0)).collect();
    planner.plan_fft_forward(len).process(&mut spectrum);

    // Positive half of the target spectrum, including its Nyquist bin
    let shared = len.min(num);
    let mut half = vec![Complex::new(0.0, 0.0); num / 2 + 1];
    half[..shared / 2 + 1].copy_from_slice(&spectrum[..shared / 2 + 1]);
    if shared % 2 == 0 {
        if num < len {
            half[shared / 2] *= 2.0;
        } else {
            half[shared / 2] *= 0.5;
        }
    }

    // Mirror into a Hermitian spectrum so the inverse is real
    let mut full = vec![Complex::new(0.0, 0.0); num];
    for (k, bin) in full.iter_mut().enumerate() {
        *bin = if k <= num / 2 {
            half[k]
        } else {
            half[num - k].conj()
        };
    }
    full[0].im = 0.0;
    if num % 2 == 0 {
        full[num / 2].im = 0.0;
    }

    planner.plan_fft_inverse(num).process(&mut full);

    // rustfft leaves the inverse unnormalized: 1/num for the inverse,
    // times num/len for the length change
    let scale = 1.0 / len as f64;
    full.iter().map(|c| c.re * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, rate: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| (2.0 * PI * freq * i as f64 / rate).sin()).collect()
    }

    #[test]
    fn test_resampled_len() {
        assert_eq!(resampled_len(22050, 22050, 44100), 44100);
        assert_eq!(resampled_len(1000, 16000, 22050), 1378);
        assert_eq!(resampled_len(3, 2, 3), 5); // 4.5 rounds up
        assert_eq!(resampled_len(10, 0, 8000), 0);
    }

    #[test]
    fn test_exact_output_length() {
        for num in [1, 7, 64, 99, 100, 301] {
            assert_eq!(resample_fft(&sine(3.0, 100.0, 100), num).len(), num);
        }
    }

    #[test]
    fn test_upsample_periodic_sine() {
        // 5 whole cycles in 100 samples
        let input = sine(5.0, 100.0, 100);
        let output = resample_fft(&input, 250);
        let expected = sine(5.0, 250.0, 250);
        for (a, b) in output.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_downsample_periodic_sine() {
        let input = sine(4.0, 200.0, 200);
        let output = resample_fft(&input, 50);
        let expected = sine(4.0, 50.0, 50);
        for (a, b) in output.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_dc_preserved() {
        let output = resample_fft(&[0.75; 30], 45);
        assert!(output.iter().all(|s| (s - 0.75).abs() < 1e-12));
    }

    #[test]
    fn test_empty_input() {
        assert!(resample_fft(&[], 0).is_empty());
        assert_eq!(resample_fft(&[], 3), vec![0.0; 3]);
    }

    #[test]
    fn test_same_length_is_identity() {
        let input = vec![0.1, -0.2, 0.3];
        assert_eq!(resample_fft(&input, 3), input);
    }
}
