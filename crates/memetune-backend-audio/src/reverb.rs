//! Delay-tap reverb.
//!
//! Each tap adds a scaled, delayed copy of the buffer into itself. Taps run
//! one after another, so a later tap hears the echoes added by earlier taps.
//! Taps are applied in the declared order; reordering them changes the
//! floating-point rounding of the result.

/// Tap delays in seconds, in application order.
pub const REVERB_TAPS_SECONDS: [f64; 2] = [0.05, 0.1];

/// Gain applied to each delayed copy.
pub const REVERB_GAIN: f64 = 0.3;

/// Applies one tap: `buffer[i] += gain * before[i - delay]` for `i >= delay`,
/// where `before` is the buffer as it was when the tap started.
///
/// Delays of zero or at least the buffer length leave the buffer unchanged.
pub fn apply_tap(buffer: &mut [f64], delay: usize, gain: f64) {
    if delay == 0 || delay >= buffer.len() {
        return;
    }
    // Walking backwards, buffer[i - delay] has not been touched yet
    for i in (delay..buffer.len()).rev() {
        buffer[i] += gain * buffer[i - delay];
    }
}

/// Applies every tap of [`REVERB_TAPS_SECONDS`] in order.
pub fn apply_reverb(buffer: &mut [f64], sample_rate: f64) {
    for seconds in REVERB_TAPS_SECONDS {
        let delay = (seconds * sample_rate) as usize;
        apply_tap(buffer, delay, REVERB_GAIN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tap_is_not_recursive() {
        let mut buffer = vec![1.0, 0.0, 0.0, 0.0, 0.0];
        apply_tap(&mut buffer, 1, 0.5);
        // One echo only; the echo is not itself echoed within the same tap
        assert_eq!(buffer, vec![1.0, 0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_taps_are_sequential() {
        let mut buffer = vec![0.0; 8];
        buffer[0] = 1.0;
        apply_tap(&mut buffer, 2, 0.3);
        apply_tap(&mut buffer, 3, 0.3);
        // Second tap echoes both the impulse and the first tap's echo
        assert_eq!(buffer[2], 0.3);
        assert_eq!(buffer[3], 0.3);
        assert!((buffer[5] - 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_delays() {
        let mut buffer = vec![1.0, 2.0, 3.0];
        apply_tap(&mut buffer, 0, 0.3);
        apply_tap(&mut buffer, 3, 0.3);
        apply_tap(&mut buffer, 10, 0.3);
        assert_eq!(buffer, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_apply_reverb_delays() {
        let sr = 100.0;
        let mut buffer = vec![0.0; 40];
        buffer[0] = 1.0;
        apply_reverb(&mut buffer, sr);
        // 0.05 s -> 5 samples, 0.1 s -> 10 samples
        assert_eq!(buffer[5], 0.3);
        assert_eq!(buffer[10], 0.3);
        assert!((buffer[15] - 0.09).abs() < 1e-12);
    }
}
