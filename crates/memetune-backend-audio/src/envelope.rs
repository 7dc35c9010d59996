//! Amplitude envelopes for notes and percussion.

/// Attack time of a note envelope in seconds.
pub const NOTE_ATTACK_SECONDS: f64 = 0.05;

/// Release time of a note envelope in seconds.
pub const NOTE_RELEASE_SECONDS: f64 = 0.1;

/// Returns `n` evenly spaced values from `start` to `end`, both inclusive.
///
/// A single point yields `[start]`; zero points yield an empty vector.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n - 1).map(|i| start + step * i as f64).collect();
            // Pin the endpoint so ramps land exactly on `end`
            values.push(end);
            values
        }
    }
}

/// Attack and release lengths in samples for a sample rate.
///
/// Both are at least one sample.
pub fn note_ramp_lengths(sample_rate: f64) -> (usize, usize) {
    let attack = ((NOTE_ATTACK_SECONDS * sample_rate) as usize).max(1);
    let release = ((NOTE_RELEASE_SECONDS * sample_rate) as usize).max(1);
    (attack, release)
}

/// Builds the envelope of one note spanning `span` samples.
///
/// If the span leaves room for a sustain segment, the envelope is a linear
/// attack, a flat sustain at 1.0 and a linear release. Otherwise it is a
/// triangle: a ramp up over the first half and down over the rest.
///
/// # Arguments
/// * `span` - Note length in samples
/// * `attack` - Attack length in samples
/// * `release` - Release length in samples
pub fn note_envelope(span: usize, attack: usize, release: usize) -> Vec<f64> {
    if span <= attack + release {
        let rise = span / 2;
        let mut env = linspace(0.0, 1.0, rise);
        env.extend(linspace(1.0, 0.0, span - rise));
        return env;
    }

    let mut env = Vec::with_capacity(span);
    env.extend(linspace(0.0, 1.0, attack));
    env.resize(span - release, 1.0);
    env.extend(linspace(1.0, 0.0, release));
    env
}

/// Exponential decay curve `exp(-linspace(0, rate, n))`.
pub fn exp_decay(rate: f64, n: usize) -> Vec<f64> {
    linspace(0.0, rate, n).into_iter().map(|x| (-x).exp()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_ramp_lengths() {
        assert_eq!(note_ramp_lengths(22050.0), (1102, 2205));
        assert_eq!(note_ramp_lengths(4.0), (1, 1));
    }

    #[test]
    fn test_long_note_has_sustain() {
        let env = note_envelope(100, 10, 20);
        assert_eq!(env.len(), 100);
        assert_eq!(env[0], 0.0);
        assert_eq!(env[9], 1.0);
        assert!(env[10..80].iter().all(|&x| x == 1.0));
        assert_eq!(env[80], 1.0);
        assert_eq!(env[99], 0.0);
    }

    #[test]
    fn test_short_note_is_triangular() {
        let env = note_envelope(7, 10, 20);
        assert_eq!(env.len(), 7);
        // 3 samples up, 4 samples down
        assert_eq!(&env[..3], &[0.0, 0.5, 1.0]);
        assert_eq!(env[3], 1.0);
        assert_eq!(env[6], 0.0);
    }

    #[test]
    fn test_single_sample_note() {
        // Rise half is empty, fall half is the single point 1.0
        assert_eq!(note_envelope(1, 10, 20), vec![1.0]);
    }

    #[test]
    fn test_boundary_span_uses_triangle() {
        let env = note_envelope(30, 10, 20);
        assert_eq!(env.len(), 30);
        assert_eq!(env[14], 1.0);
        assert_eq!(env[15], 1.0);
    }

    #[test]
    fn test_exp_decay() {
        let d = exp_decay(3.0, 4);
        assert_eq!(d.len(), 4);
        assert_eq!(d[0], 1.0);
        assert!((d[3] - (-3.0_f64).exp()).abs() < 1e-12);
        assert!(d.windows(2).all(|w| w[1] < w[0]));
    }
}
