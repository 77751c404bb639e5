//! Player stats aggregation: a confirmed match plus a snapshot of participant
//! profiles in, a per-player field diff out. Pure; persistence happens elsewhere.

use std::collections::HashMap;

use serde_json::json;

use crate::logic::rating::{elo_update, sportsmanship_average, DEFAULT_K_FACTOR};
use crate::models::{MatchRecord, PlayerProfile, Punctuality, DEFAULT_ELO_RATING};
use crate::store::Patch;

/// Changed profile fields for one player. `None` means "leave untouched", so a
/// delta translates into a minimal partial write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileDelta {
    pub elo_rating: Option<i64>,
    pub total_matches_played: Option<u32>,
    pub matches_won: Option<u32>,
    pub matches_lost: Option<u32>,
    pub no_shows: Option<u32>,
    pub sportsmanship_score: Option<f64>,
}

impl ProfileDelta {
    pub fn is_empty(&self) -> bool {
        self.elo_rating.is_none()
            && self.total_matches_played.is_none()
            && self.matches_won.is_none()
            && self.matches_lost.is_none()
            && self.no_shows.is_none()
            && self.sportsmanship_score.is_none()
    }

    /// Wire-format patch with only the changed fields.
    pub fn to_patch(&self) -> Patch {
        let mut patch = Patch::new();
        if let Some(v) = self.elo_rating {
            patch = patch.set("eloRating", json!(v));
        }
        if let Some(v) = self.total_matches_played {
            patch = patch.set("totalMatchesPlayed", json!(v));
        }
        if let Some(v) = self.matches_won {
            patch = patch.set("matchesWon", json!(v));
        }
        if let Some(v) = self.matches_lost {
            patch = patch.set("matchesLost", json!(v));
        }
        if let Some(v) = self.no_shows {
            patch = patch.set("noShows", json!(v));
        }
        if let Some(v) = self.sportsmanship_score {
            patch = patch.set("sportsmanshipScore", json!(v));
        }
        patch
    }
}

/// Compute all profile mutations for a confirmed match.
///
/// `profiles` holds the fetched participants; players whose profile document is
/// absent are skipped, never defaulted into existence. The step order matters:
///
/// 1. peer ratings (no-show counter, sportsmanship rolling average weighted by
///    the pre-increment match count);
/// 2. one appearance per distinct participant;
/// 3. win/loss counters and Elo for decisive 1v1 results, fed by pre-match
///    ratings. A missing opponent contributes the default rating; their own
///    write is dropped.
pub fn aggregate_stats(
    record: &MatchRecord,
    profiles: &HashMap<String, PlayerProfile>,
) -> HashMap<String, ProfileDelta> {
    let mut updated = profiles.clone();

    for rating in &record.player_ratings {
        if let Some(profile) = updated.get_mut(&rating.rated_user_id) {
            if rating.punctuality == Punctuality::NoShow {
                profile.no_shows += 1;
            }
            profile.sportsmanship_score = sportsmanship_average(
                profile.sportsmanship_score,
                profile.total_matches_played,
                rating.sportsmanship,
            );
        }
    }

    for id in record.participant_ids() {
        if let Some(profile) = updated.get_mut(&id) {
            profile.total_matches_played += 1;
        }
    }

    if let Some((winner_id, loser_id)) = record.decisive_one_v_one() {
        let winner_before = pre_match_rating(profiles, winner_id);
        let loser_before = pre_match_rating(profiles, loser_id);
        let (winner_after, loser_after) = elo_update(winner_before, loser_before, DEFAULT_K_FACTOR);
        if let Some(profile) = updated.get_mut(winner_id) {
            profile.matches_won += 1;
            profile.elo_rating = winner_after;
        }
        if let Some(profile) = updated.get_mut(loser_id) {
            profile.matches_lost += 1;
            profile.elo_rating = loser_after;
        }
    }

    updated
        .into_iter()
        .filter_map(|(id, after)| {
            let before = &profiles[&id];
            let delta = diff(before, &after);
            if delta.is_empty() {
                None
            } else {
                Some((id, delta))
            }
        })
        .collect()
}

fn pre_match_rating(profiles: &HashMap<String, PlayerProfile>, id: &str) -> i64 {
    profiles
        .get(id)
        .map(|p| p.elo_rating)
        .unwrap_or(DEFAULT_ELO_RATING)
}

fn diff(before: &PlayerProfile, after: &PlayerProfile) -> ProfileDelta {
    ProfileDelta {
        elo_rating: changed(before.elo_rating, after.elo_rating),
        total_matches_played: changed(before.total_matches_played, after.total_matches_played),
        matches_won: changed(before.matches_won, after.matches_won),
        matches_lost: changed(before.matches_lost, after.matches_lost),
        no_shows: changed(before.no_shows, after.no_shows),
        sportsmanship_score: changed(before.sportsmanship_score, after.sportsmanship_score),
    }
}

fn changed<T: PartialEq>(before: T, after: T) -> Option<T> {
    if before == after {
        None
    } else {
        Some(after)
    }
}
