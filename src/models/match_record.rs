//! Match record and peer ratings for casual (non-tournament) matches.

use serde::{Deserialize, Serialize};

/// Result confirmation state of a match. Side effects fire only on the first
/// transition into `Confirmed`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    #[default]
    NoResult,
    Pending,
    Confirmed,
}

/// Which side won a match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Team1,
    Team2,
    Draw,
}

/// One roster entry (`{userId}` objects in the team arrays).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub user_id: String,
}

impl TeamMember {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Peer-reported attendance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Punctuality {
    OnTime,
    Late,
    /// The reliability marker: the rated player did not attend.
    NoShow,
}

/// One peer rating submitted by a participant about another participant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerRating {
    pub rated_user_id: String,
    pub punctuality: Punctuality,
    /// Behavioral rating in [0, 10].
    pub sportsmanship: f64,
}

/// A casual match document (`matches/{matchId}`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(default)]
    pub team1_players: Vec<TeamMember>,
    #[serde(default)]
    pub team2_players: Vec<TeamMember>,
    #[serde(default)]
    pub winner: Option<Winner>,
    #[serde(default)]
    pub result_status: ResultStatus,
    #[serde(default)]
    pub player_ratings: Vec<PeerRating>,
}

impl MatchRecord {
    /// Distinct participant ids from both teams, first-seen order preserved.
    /// A player listed twice still counts once.
    pub fn participant_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for member in self.team1_players.iter().chain(self.team2_players.iter()) {
            if !ids.contains(&member.user_id) {
                ids.push(member.user_id.clone());
            }
        }
        ids
    }

    /// `(winner_id, loser_id)` when this is a decisive 1v1 match, else `None`.
    /// Draws and team matches carry no rating consequences.
    pub fn decisive_one_v_one(&self) -> Option<(&str, &str)> {
        if self.team1_players.len() != 1 || self.team2_players.len() != 1 {
            return None;
        }
        let p1 = self.team1_players[0].user_id.as_str();
        let p2 = self.team2_players[0].user_id.as_str();
        match self.winner {
            Some(Winner::Team1) => Some((p1, p2)),
            Some(Winner::Team2) => Some((p2, p1)),
            _ => None,
        }
    }
}

/// True exactly when a snapshot pair crosses into `Confirmed` for the first time.
/// This gate is what makes redelivered events safe to process.
pub fn is_first_confirmation(before: ResultStatus, after: ResultStatus) -> bool {
    before != ResultStatus::Confirmed && after == ResultStatus::Confirmed
}
