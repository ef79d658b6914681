//! Cache entries and the publication-year TTL policy.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{GameId, GameRecord, PlayerCountSet, PlayerCounts};

/// Plausible publication year: one to four digits.
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,4}$").expect("hardcoded pattern"));

/// Derives a cache entry's lifetime from its game's publication year.
///
/// Older games change recommendation data less often, so they are cached
/// longer: `ttl_days = base_days + (current_year - published_year) *
/// per_year_days`. A year that is not a 1-4 digit number substitutes
/// `fallback_year`.
#[derive(Debug, Clone, Copy)]
pub struct TtlPolicy {
    pub base_days: i64,
    pub per_year_days: i64,
    pub fallback_year: i32,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            base_days: 30,
            per_year_days: 10,
            fallback_year: 2000,
        }
    }
}

impl TtlPolicy {
    /// Compute the TTL in days for a game published in `published_year`.
    #[must_use]
    pub fn ttl_days(&self, published_year: &str, current_year: i32) -> i64 {
        let year = if YEAR.is_match(published_year) {
            published_year.parse().unwrap_or(self.fallback_year)
        } else {
            self.fallback_year
        };
        self.base_days + i64::from(current_year - year) * self.per_year_days
    }
}

/// An immutable cached lookup result for one game.
///
/// A refetch produces a brand-new entry that wholly replaces the old one;
/// entries are never merged or mutated in place.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    id: GameId,
    best_with: PlayerCountSet,
    recommended_with: PlayerCountSet,
    created_at: DateTime<Utc>,
    ttl_days: i64,
}

impl CacheEntry {
    /// Build an entry from a decoded upstream record, stamping it with the
    /// creation time and the TTL derived from the record's publication year.
    pub fn from_record(record: GameRecord, policy: &TtlPolicy, now: DateTime<Utc>) -> Self {
        use chrono::Datelike;

        let ttl_days = policy.ttl_days(&record.published_year, now.year());
        Self {
            id: record.id,
            best_with: record.best_with,
            recommended_with: record.recommended_with,
            created_at: now,
            ttl_days,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn ttl_days(&self) -> i64 {
        self.ttl_days
    }

    /// True when the entry's age exceeds its TTL.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > Duration::days(self.ttl_days)
    }

    /// The per-game result view of this entry.
    #[must_use]
    pub fn counts(&self) -> PlayerCounts {
        PlayerCounts {
            id: self.id,
            best_with: self.best_with,
            recommended_with: self.recommended_with,
        }
    }
}
