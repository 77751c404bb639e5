//! Single-elimination bracket layout: rounds, forward links, byes. Pure over an
//! already-shuffled participant list; persistence and seeding happen elsewhere.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{MatchStatus, ResultStatus, TournamentMatch};

/// ceil(log2(n)): rounds needed for `n` participants. Requires n >= 2.
pub fn total_rounds(participant_count: usize) -> u32 {
    usize::BITS - (participant_count - 1).leading_zeros()
}

/// Lay out the full bracket for `participants` (already shuffled), returning
/// `(match_id, match)` pairs in round-major order from round 1.
///
/// A bracket over `n` players spans `2^rounds - 1` slots; `n - 1` of them get
/// decided by play. Forward links pair adjacent slots into one parent in the
/// next round: slot `m` feeds slot `m/2 + first_round_slots`. The final links
/// nowhere.
///
/// Round 1 takes consecutive participant pairs into its leading slots; the
/// `2^rounds - n` trailing slots take one participant each and are byes,
/// completed on the spot with that participant as winner. Byes are not
/// confirmed here; the caller advances them separately. A power-of-two
/// participant count produces no byes.
pub fn layout_bracket(
    tournament_id: &str,
    participants: &[String],
    created_at: DateTime<Utc>,
) -> Vec<(String, TournamentMatch)> {
    let n = participants.len();
    debug_assert!(n >= 2, "bracket needs at least two participants");

    let rounds = total_rounds(n);
    let first_round_slots = 1usize << (rounds - 1);
    let total_slots = (1usize << rounds) - 1;
    let ids: Vec<String> = (0..total_slots)
        .map(|_| Uuid::new_v4().to_string())
        .collect();

    let mut slots: Vec<(String, TournamentMatch)> = Vec::with_capacity(total_slots);
    let mut index = 0usize;
    for round in 1..=rounds {
        let matches_in_round = 1usize << (rounds - round);
        for number in 0..matches_in_round {
            let next_match_id = if round < rounds {
                Some(ids[index / 2 + first_round_slots].clone())
            } else {
                None
            };
            slots.push((
                ids[index].clone(),
                TournamentMatch {
                    tournament_id: tournament_id.to_string(),
                    round,
                    match_number_in_round: (number + 1) as u32,
                    player1_id: None,
                    player2_id: None,
                    winner_id: None,
                    next_match_id,
                    status: MatchStatus::Pending,
                    result_status: ResultStatus::NoResult,
                    result_confirmed_by: Vec::new(),
                    created_at,
                },
            ));
            index += 1;
        }
    }

    let byes = (1usize << rounds) - n;
    let paired_slots = first_round_slots - byes;
    let mut remaining = participants.iter();
    for slot in 0..first_round_slots {
        let m = &mut slots[slot].1;
        if slot < paired_slots {
            m.player1_id = remaining.next().cloned();
            m.player2_id = remaining.next().cloned();
            m.status = MatchStatus::Scheduled;
        } else {
            let sole = remaining.next().cloned();
            m.player1_id = sole.clone();
            m.winner_id = sole;
            m.status = MatchStatus::Completed;
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_for_small_fields() {
        assert_eq!(total_rounds(2), 1);
        assert_eq!(total_rounds(3), 2);
        assert_eq!(total_rounds(4), 2);
        assert_eq!(total_rounds(5), 3);
        assert_eq!(total_rounds(8), 3);
        assert_eq!(total_rounds(9), 4);
    }

    #[test]
    fn links_converge_on_the_final() {
        let participants: Vec<String> = (0..8).map(|i| format!("p{i}")).collect();
        let slots = layout_bracket("t1", &participants, chrono::Utc::now());
        assert_eq!(slots.len(), 7);

        // Every non-final match links to an existing match one round later.
        for (id, m) in &slots[..6] {
            let next = m.next_match_id.as_ref().expect("non-final must link");
            let (_, parent) = slots.iter().find(|(pid, _)| pid == next).unwrap();
            assert_eq!(parent.round, m.round + 1);
            assert_ne!(id, next);
        }
        assert_eq!(slots[6].1.next_match_id, None);
        assert_eq!(slots[6].1.round, 3);

        // Each parent has exactly two feeders.
        for (id, _) in &slots[4..] {
            let feeders = slots
                .iter()
                .filter(|(_, m)| m.next_match_id.as_deref() == Some(id.as_str()))
                .count();
            assert_eq!(feeders, 2);
        }
    }

    #[test]
    fn byes_fill_trailing_slots() {
        let participants: Vec<String> = (0..5).map(|i| format!("p{i}")).collect();
        let slots = layout_bracket("t1", &participants, chrono::Utc::now());
        assert_eq!(slots.len(), 7);

        let round1: Vec<_> = slots.iter().filter(|(_, m)| m.round == 1).collect();
        assert_eq!(round1.len(), 4);
        let scheduled = round1
            .iter()
            .filter(|(_, m)| m.status == MatchStatus::Scheduled)
            .count();
        let byes: Vec<_> = round1
            .iter()
            .filter(|(_, m)| m.status == MatchStatus::Completed)
            .collect();
        assert_eq!(scheduled, 1);
        assert_eq!(byes.len(), 3);
        for (_, m) in byes {
            assert!(m.player2_id.is_none());
            assert_eq!(m.winner_id, m.player1_id);
            assert_eq!(m.result_status, ResultStatus::NoResult);
        }
    }
}
