//! Genre names and base frequencies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Base frequency used for genres without an entry of their own.
pub const DEFAULT_BASE_FREQUENCY: f64 = 55.0;

/// Musical genre of a generation request.
///
/// The genre only selects the base frequency of the melody. Parsing never
/// fails: names outside the known set are kept as [`Genre::Other`] and use
/// [`DEFAULT_BASE_FREQUENCY`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Genre {
    #[default]
    Electronic,
    Pop,
    Classical,
    HipHop,
    Ambient,
    /// Any other genre name.
    Other(String),
}

impl Genre {
    /// The genres with a dedicated base frequency, in display order.
    pub const KNOWN: [Genre; 5] = [
        Genre::Electronic,
        Genre::Pop,
        Genre::Classical,
        Genre::HipHop,
        Genre::Ambient,
    ];

    /// Returns the display name.
    pub fn as_str(&self) -> &str {
        match self {
            Genre::Electronic => "Electronic",
            Genre::Pop => "Pop",
            Genre::Classical => "Classical",
            Genre::HipHop => "Hip-Hop",
            Genre::Ambient => "Ambient",
            Genre::Other(name) => name,
        }
    }

    /// Returns the melody base frequency in Hz.
    pub fn base_frequency(&self) -> f64 {
        match self {
            Genre::Electronic => 55.0,
            Genre::Pop => 65.0,
            Genre::Classical => 55.0,
            Genre::HipHop => 50.0,
            Genre::Ambient => 32.0,
            Genre::Other(_) => DEFAULT_BASE_FREQUENCY,
        }
    }

    /// Parses a genre name. Matching is exact on the display name.
    pub fn parse(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|genre| genre.as_str() == name)
            .cloned()
            .unwrap_or_else(|| Genre::Other(name.to_string()))
    }
}

impl FromStr for Genre {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Genre {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        genre.as_str().to_string()
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_names_round_trip() {
        for genre in Genre::KNOWN {
            assert_eq!(Genre::parse(genre.as_str()), genre);
        }
    }

    #[test]
    fn test_hip_hop_uses_hyphenated_name() {
        assert_eq!(Genre::parse("Hip-Hop"), Genre::HipHop);
        assert_eq!(Genre::HipHop.to_string(), "Hip-Hop");
    }

    #[test]
    fn test_unknown_genre_falls_back() {
        let genre: Genre = "Polka".parse().unwrap();
        assert_eq!(genre, Genre::Other("Polka".to_string()));
        assert_eq!(genre.base_frequency(), DEFAULT_BASE_FREQUENCY);
    }

    #[test]
    fn test_base_frequencies() {
        assert_eq!(Genre::Pop.base_frequency(), 65.0);
        assert_eq!(Genre::HipHop.base_frequency(), 50.0);
        assert_eq!(Genre::Ambient.base_frequency(), 32.0);
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&Genre::HipHop).unwrap();
        assert_eq!(json, "\"Hip-Hop\"");
        let back: Genre = serde_json::from_str("\"Vaporwave\"").unwrap();
        assert_eq!(back, Genre::Other("Vaporwave".into()));
    }
}
