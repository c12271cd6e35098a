//! Dotted numeric game version, as it appears in data filenames.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a game version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unparseable game version: \"{0}\"")]
pub struct ParseVersionError(pub String);

/// A game client version such as `0.7.1` or `1.10.0.4`.
///
/// Two to four numeric segments, ordered segment by segment. A version with
/// fewer segments sorts before the same prefix with more (`1.0` < `1.0.0`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameVersion {
    segments: Vec<u32>,
}

impl GameVersion {
    /// The numeric segments, most significant first.
    pub fn segments(&self) -> &[u32] {
        &self.segments
    }
}

impl FromStr for GameVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<u32> = s
            .split('.')
            .map(|token| token.parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| ParseVersionError(s.to_string()))?;
        if !(2..=4).contains(&segments.len()) {
            return Err(ParseVersionError(s.to_string()));
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<String> = self.segments.iter().map(u32::to_string).collect();
        write!(f, "{}", text.join("."))
    }
}

impl TryFrom<String> for GameVersion {
    type Error = ParseVersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<GameVersion> for String {
    fn from(version: GameVersion) -> Self {
        version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> GameVersion {
        s.parse().unwrap()
    }

    #[test]
    fn parses_two_to_four_segments() {
        assert_eq!(v("0.7").segments(), &[0, 7]);
        assert_eq!(v("0.7.1").segments(), &[0, 7, 1]);
        assert_eq!(v("1.10.0.4").segments(), &[1, 10, 0, 4]);
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!("7".parse::<GameVersion>().is_err());
        assert!("1.2.3.4.5".parse::<GameVersion>().is_err());
        assert!("1.x".parse::<GameVersion>().is_err());
        assert!("1.".parse::<GameVersion>().is_err());
        assert!("".parse::<GameVersion>().is_err());
        assert!("-1.2".parse::<GameVersion>().is_err());
    }

    #[test]
    fn orders_numerically_not_lexically() {
        assert!(v("0.9") < v("0.10"));
        assert!(v("0.7.1") < v("0.7.2"));
        assert!(v("0.7") < v("0.7.0"));
        assert!(v("1.0") > v("0.99.99"));
        assert_eq!(v("1.2.3"), v("1.2.3"));
    }

    #[test]
    fn display_round_trips() {
        for text in ["0.7", "0.7.1", "1.10.0.4"] {
            assert_eq!(v(text).to_string(), text);
        }
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&v("0.7.1")).unwrap();
        assert_eq!(json, "\"0.7.1\"");
        let back: GameVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v("0.7.1"));
        assert!(serde_json::from_str::<GameVersion>("\"nope\"").is_err());
    }

    #[test]
    fn parse_error_display() {
        let err = "bogus".parse::<GameVersion>().unwrap_err();
        assert!(format!("{err}").contains("bogus"));
    }
}
