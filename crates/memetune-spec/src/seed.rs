//! Seed derivation.
//!
//! Any text can act as a seed. The text is hashed with BLAKE3 and the
//! 256-bit digest, read as a big-endian unsigned integer, is reduced modulo
//! 2^31:
//!
//! ```text
//! seed = int_be(BLAKE3(utf8(text))) mod 2^31
//! ```
//!
//! Bytes before the last four weigh multiples of 2^32, and 2^31 divides
//! 2^32, so only the last four digest bytes contribute to the remainder.

use serde::{Deserialize, Serialize};

/// Exclusive upper bound of derived seeds (2^31).
pub const MAX_SEED: u32 = 1 << 31;

/// Derives a 31-bit seed from arbitrary text.
///
/// The same text always produces the same seed. Distinct text produces a
/// distinct seed with overwhelming probability, though collisions are
/// possible in the reduced range.
///
/// # Example
/// ```
/// use memetune_spec::seed::{seed_from_text, MAX_SEED};
///
/// let seed = seed_from_text("hello world");
/// assert_eq!(seed, seed_from_text("hello world"));
/// assert!(seed < MAX_SEED);
/// ```
pub fn seed_from_text(text: &str) -> u32 {
    let hash = blake3::hash(text.as_bytes());
    let digest = hash.as_bytes();

    let mut tail = [0u8; 4];
    tail.copy_from_slice(&digest[digest.len() - 4..]);
    u32::from_be_bytes(tail) & (MAX_SEED - 1)
}

/// A seed as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    /// A numeric seed used as-is.
    Value(u32),
    /// Seed text, hashed with [`seed_from_text`].
    Text(String),
}

impl Seed {
    /// Seed used when seed text is blank.
    pub const FALLBACK: u32 = 0;

    /// Returns the numeric seed.
    ///
    /// Blank seed text resolves to [`Seed::FALLBACK`] rather than to the hash
    /// of the empty string, so whitespace typed into a seed field does not
    /// silently change the output.
    pub fn resolve(&self) -> u32 {
        match self {
            Seed::Value(value) => *value,
            Seed::Text(text) if text.trim().is_empty() => Self::FALLBACK,
            Seed::Text(text) => seed_from_text(text),
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Value(Self::FALLBACK)
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Seed::Value(value)
    }
}

impl From<&str> for Seed {
    fn from(text: &str) -> Self {
        Seed::Text(text.to_string())
    }
}
