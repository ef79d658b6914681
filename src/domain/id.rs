//! Domain identifier types with proper encapsulation.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Full id-list shape: digits, optionally repeated as comma-separated groups.
static ID_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:,\d+)*$").expect("hardcoded pattern"));

/// Board game identifier - newtype for type safety.
///
/// Ids are externally supplied and unique per game. On the wire the id is
/// a decimal string, so serde round-trips through `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(u64);

impl GameId {
    /// Create a new `GameId`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the numeric value of the id.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GameId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl Serialize for GameId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GameId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u64>()
            .map(GameId::new)
            .map_err(serde::de::Error::custom)
    }
}

/// Parse a raw comma-separated id list into an ordered sequence of ids.
///
/// The full input must consist of decimal digit groups separated by single
/// commas and nothing else. Duplicates are preserved and no deduplication
/// is performed. Any violation yields [`Error::InvalidIdList`] with no
/// partial parse.
pub fn parse_id_list(raw: &str) -> Result<Vec<GameId>> {
    if !ID_LIST.is_match(raw) {
        return Err(Error::InvalidIdList);
    }
    raw.split(',')
        .map(|token| {
            token
                .parse::<u64>()
                .map(GameId::new)
                .map_err(|_| Error::InvalidIdList)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_id_display_and_value() {
        let id = GameId::new(174430);
        assert_eq!(id.value(), 174430);
        assert_eq!(format!("{id}"), "174430");
    }

    #[test]
    fn game_id_serializes_as_string() {
        let json = serde_json::to_string(&GameId::new(4)).unwrap();
        assert_eq!(json, "\"4\"");
    }

    #[test]
    fn game_id_deserializes_from_string() {
        let id: GameId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(id, GameId::new(42));
    }

    #[test]
    fn parses_single_id() {
        assert_eq!(parse_id_list("7").unwrap(), vec![GameId::new(7)]);
    }

    #[test]
    fn parses_multiple_ids_in_order() {
        let ids = parse_id_list("3,1,2").unwrap();
        assert_eq!(ids, vec![GameId::new(3), GameId::new(1), GameId::new(2)]);
    }

    #[test]
    fn preserves_duplicates() {
        let ids = parse_id_list("4,4").unwrap();
        assert_eq!(ids, vec![GameId::new(4), GameId::new(4)]);
    }

    #[test]
    fn rejects_letters() {
        assert!(matches!(parse_id_list("1,a"), Err(Error::InvalidIdList)));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(parse_id_list(""), Err(Error::InvalidIdList)));
    }

    #[test]
    fn rejects_trailing_comma() {
        assert!(matches!(parse_id_list("1,2,"), Err(Error::InvalidIdList)));
    }

    #[test]
    fn rejects_whitespace() {
        assert!(matches!(parse_id_list("1, 2"), Err(Error::InvalidIdList)));
    }

    #[test]
    fn rejects_out_of_range_id() {
        // 2^64 does not fit a u64
        assert!(matches!(
            parse_id_list("18446744073709551616"),
            Err(Error::InvalidIdList)
        ));
    }
}
