//! Decoded upstream records and the per-game result shape.

use serde::{Deserialize, Serialize};

use super::{GameId, PlayerCountSet};

/// A decoded upstream record, prior to TTL stamping.
///
/// The publication year is kept raw; parsing and the fallback-year rule
/// happen when the cache entry is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub id: GameId,
    pub best_with: PlayerCountSet,
    pub recommended_with: PlayerCountSet,
    pub published_year: String,
}

/// One item of a lookup result.
///
/// Serializes as `{"id": "<string>", "bestWith": [..], "recommendedWith":
/// [..]}` with arrays sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCounts {
    pub id: GameId,
    pub best_with: PlayerCountSet,
    pub recommended_with: PlayerCountSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_counts_wire_shape() {
        let counts = PlayerCounts {
            id: GameId::new(174430),
            best_with: [3].into_iter().collect(),
            recommended_with: [2, 3, 4].into_iter().collect(),
        };
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(
            json,
            r#"{"id":"174430","bestWith":[3],"recommendedWith":[2,3,4]}"#
        );
    }

    #[test]
    fn player_counts_round_trip() {
        let json = r#"{"id":"9","bestWith":[2],"recommendedWith":[1,2]}"#;
        let counts: PlayerCounts = serde_json::from_str(json).unwrap();
        assert_eq!(counts.id, GameId::new(9));
        assert_eq!(serde_json::to_string(&counts).unwrap(), json);
    }
}
