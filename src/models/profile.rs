//! Player profile: the per-user ranking record in the system of record.

use serde::{Deserialize, Serialize};

/// Starting Elo rating for players without a recorded rating.
pub const DEFAULT_ELO_RATING: i64 = 1200;

/// Starting sportsmanship score (midpoint of the 0..10 scale).
pub const DEFAULT_SPORTSMANSHIP: f64 = 5.0;

/// A player's ranking profile (`users/{userId}`).
///
/// Field defaults mirror the wire format: documents written before a field
/// existed deserialize with the same fallbacks the readers always applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    #[serde(default = "default_elo")]
    pub elo_rating: i64,
    #[serde(default)]
    pub total_matches_played: u32,
    #[serde(default)]
    pub matches_won: u32,
    #[serde(default)]
    pub matches_lost: u32,
    /// Times this player was peer-rated as not having shown up.
    #[serde(default)]
    pub no_shows: u32,
    /// Rolling average of peer sportsmanship ratings, in [0, 10].
    #[serde(default = "default_sportsmanship")]
    pub sportsmanship_score: f64,
}

fn default_elo() -> i64 {
    DEFAULT_ELO_RATING
}

fn default_sportsmanship() -> f64 {
    DEFAULT_SPORTSMANSHIP
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerProfile {
    /// A fresh profile with all defaults (1200 Elo, 5.0 sportsmanship, zero counters).
    pub fn new() -> Self {
        Self {
            elo_rating: DEFAULT_ELO_RATING,
            total_matches_played: 0,
            matches_won: 0,
            matches_lost: 0,
            no_shows: 0,
            sportsmanship_score: DEFAULT_SPORTSMANSHIP,
        }
    }
}
