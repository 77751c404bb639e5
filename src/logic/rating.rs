//! Rating math: Elo updates and the sportsmanship rolling average. Pure, no I/O.

/// K-factor used for all Elo updates.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// New `(winner, loser)` ratings after a decisive 1v1 result.
///
/// Standard Elo expected-score update, rounded to whole points. Only decisive
/// 1v1 matches are rated; callers skip draws and team matches.
pub fn elo_update(winner_rating: i64, loser_rating: i64, k_factor: f64) -> (i64, i64) {
    let expected_winner =
        1.0 / (1.0 + 10f64.powf((loser_rating - winner_rating) as f64 / 400.0));
    let expected_loser = 1.0 - expected_winner;
    let new_winner = (winner_rating as f64 + k_factor * (1.0 - expected_winner)).round() as i64;
    let new_loser = (loser_rating as f64 + k_factor * (0.0 - expected_loser)).round() as i64;
    (new_winner, new_loser)
}

/// Fold one peer rating into the rolling sportsmanship average.
///
/// `matches_before` is the player's match count *before* this match is counted;
/// it weighs the current average. Result is rounded to 2 decimals.
pub fn sportsmanship_average(current_score: f64, matches_before: u32, new_rating: f64) -> f64 {
    let average =
        (current_score * matches_before as f64 + new_rating) / (matches_before as f64 + 1.0);
    round2(average)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
