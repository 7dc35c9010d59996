//! Deterministic RNG using PCG32.
//!
//! All randomness in the audio backend flows through this module. Every
//! synthesis call builds its own generator from the request seed, so
//! concurrent calls never share generator state.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    // Expand 32-bit seed to 64-bit for PCG32 state
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Draws one standard normal sample using the Box-Muller transform.
///
/// Consumes exactly two uniform draws per call, which keeps the stream
/// position predictable for a given number of samples.
pub fn standard_normal(rng: &mut Pcg32) -> f64 {
    // 1 - u keeps the argument of ln in (0, 1]
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
