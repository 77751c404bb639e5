//! Tournament and single-elimination tournament match documents.

use crate::models::match_record::ResultStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a tournament document.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

/// A tournament document (`tournaments/{tournamentId}`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub organizer_id: String,
    /// Users allowed to manage the tournament besides the organizer.
    #[serde(default)]
    pub admins: Vec<String>,
    /// Denormalized registration count, maintained by the registration handlers.
    #[serde(default)]
    pub participant_count: i64,
    #[serde(default)]
    pub status: TournamentStatus,
}

impl Tournament {
    /// Whether `user_id` may run organizer actions (generate the bracket).
    pub fn can_manage(&self, user_id: &str) -> bool {
        self.organizer_id == user_id || self.admins.iter().any(|a| a == user_id)
    }
}

/// Scheduling state of a bracket slot.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Waiting for players from earlier rounds.
    #[default]
    Pending,
    /// Both player slots filled; ready to play.
    Scheduled,
    /// Decided (played out, or a bye).
    Completed,
}

/// One slot in a single-elimination bracket (`tournaments/{tid}/matches/{matchId}`).
///
/// `next_match_id` links each slot to its parent in the following round and is
/// `None` only for the final. Round 1 is the earliest round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentMatch {
    pub tournament_id: String,
    pub round: u32,
    pub match_number_in_round: u32,
    #[serde(default)]
    pub player1_id: Option<String>,
    #[serde(default)]
    pub player2_id: Option<String>,
    #[serde(default)]
    pub winner_id: Option<String>,
    #[serde(default)]
    pub next_match_id: Option<String>,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub result_status: ResultStatus,
    /// Participants who confirmed the reported result.
    #[serde(default)]
    pub result_confirmed_by: Vec<String>,
    pub created_at: DateTime<Utc>,
}
