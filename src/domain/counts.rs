//! Canonical player-count set and free-form phrase extraction.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Upper bound on a player count. Reflects real-world table-top ranges.
pub const MAX_PLAYERS: u8 = 9;

/// A bare integer or an inclusive `A-B` / `A–B` range inside a phrase.
static NUMBER_OR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(?:[–-](\d+))?").expect("hardcoded pattern"));

/// A set of player counts in `1..=MAX_PLAYERS`.
///
/// This is the one canonical representation used for storage, comparison,
/// and serialization alike. Backed by a bitmask; serializes as a sorted
/// ascending JSON array of integers. Inserts outside the bounded range are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlayerCountSet(u16);

impl PlayerCountSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player count. Counts outside `1..=MAX_PLAYERS` are ignored.
    pub fn insert(&mut self, count: u8) {
        if (1..=MAX_PLAYERS).contains(&count) {
            self.0 |= 1 << count;
        }
    }

    /// Merge another set into this one.
    pub fn extend(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// True when the given count is in the set.
    #[must_use]
    pub fn contains(&self, count: u8) -> bool {
        count <= MAX_PLAYERS && self.0 & (1 << count) != 0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Player counts in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=MAX_PLAYERS).filter(move |count| self.contains(*count))
    }
}

impl FromIterator<u8> for PlayerCountSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut counts = Self::new();
        for count in iter {
            counts.insert(count);
        }
        counts
    }
}

impl fmt::Display for PlayerCountSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for count in self.iter() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{count}")?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for PlayerCountSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for PlayerCountSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let counts = Vec::<u8>::deserialize(deserializer)?;
        Ok(counts.into_iter().collect())
    }
}

/// Expand a free-form player-count phrase into the set of counts it denotes.
///
/// Each token is either a bare integer ("Best with 2 players" → {2}) or an
/// inclusive range with a hyphen or en dash ("2-4" → {2,3,4}, "1–3" →
/// {1,2,3}). Malformed tokens are skipped silently.
pub fn extract_player_counts(input: &str) -> PlayerCountSet {
    let mut counts = PlayerCountSet::new();
    for caps in NUMBER_OR_RANGE.captures_iter(input) {
        let Ok(start) = caps[1].parse::<u32>() else {
            continue;
        };
        match caps.get(2) {
            Some(end) => {
                let Ok(end) = end.as_str().parse::<u32>() else {
                    continue;
                };
                // counts above MAX_PLAYERS never land in the set, so the
                // range can be clamped to keep the loop bounded
                for value in start..=end.min(u32::from(MAX_PLAYERS)) {
                    if let Ok(count) = u8::try_from(value) {
                        counts.insert(count);
                    }
                }
            }
            None => {
                if let Ok(count) = u8::try_from(start) {
                    counts.insert(count);
                }
            }
        }
    }
    counts
}
