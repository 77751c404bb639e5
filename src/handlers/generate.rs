//! Synchronous bracket generation: the one organizer-invoked operation.

use chrono::Utc;
use log::{error, info};
use rand::seq::SliceRandom;
use serde::Serialize;
use serde_json::json;

use crate::handlers::advance::advance_winner;
use crate::logic::layout_bracket;
use crate::models::{EngineError, Tournament, TournamentMatch};
use crate::store::{
    from_doc, registrations_collection, to_doc, tournament_match_path,
    tournament_matches_collection, tournament_path, DocumentStore, Filter, Patch, Write,
};

/// Result payload for the synchronous caller.
#[derive(Clone, Debug, Serialize)]
pub struct GenerateOutcome {
    pub success: bool,
    pub message: String,
}

/// Generate the single-elimination bracket for a tournament.
///
/// Validation happens before any write, so every failure up to the commit
/// leaves no partial bracket: missing id → invalid-argument, no caller →
/// unauthenticated, unknown tournament → not-found, caller neither organizer
/// nor admin → permission-denied, fewer than two registrations →
/// failed-precondition. Seeding is a uniform shuffle; there is no skill-based
/// placement. All match documents plus the tournament's `active` status commit
/// as one atomic batch, after which bye winners are pushed into their next
/// matches.
pub fn generate_bracket(
    store: &dyn DocumentStore,
    tournament_id: &str,
    caller: Option<&str>,
) -> Result<GenerateOutcome, EngineError> {
    if tournament_id.trim().is_empty() {
        return Err(EngineError::InvalidArgument(
            "the operation must be called with a 'tournamentId'".to_string(),
        ));
    }
    let caller = caller.ok_or(EngineError::Unauthenticated)?;

    let t_path = tournament_path(tournament_id);
    let doc = store
        .get(&t_path)?
        .ok_or_else(|| EngineError::NotFound(format!("Tournament {tournament_id}")))?;
    let tournament: Tournament = from_doc(doc)?;
    if !tournament.can_manage(caller) {
        return Err(EngineError::PermissionDenied(
            "only the organizer or an admin may generate the bracket".to_string(),
        ));
    }

    let mut participants: Vec<String> = store
        .query(&registrations_collection(tournament_id), &[])?
        .into_iter()
        .map(|(user_id, _)| user_id)
        .collect();
    if participants.len() < 2 {
        return Err(EngineError::FailedPrecondition(
            "at least two participants are required to generate a bracket".to_string(),
        ));
    }

    participants.shuffle(&mut rand::thread_rng());

    let slots = layout_bracket(tournament_id, &participants, Utc::now());
    let mut writes: Vec<Write> = Vec::with_capacity(slots.len() + 1);
    for (match_id, m) in &slots {
        writes.push(Write::Create {
            path: tournament_match_path(tournament_id, match_id),
            doc: to_doc(m)?,
        });
    }
    writes.push(Write::Update {
        path: t_path,
        patch: Patch::new().set("status", json!("active")),
    });

    store.batch_write(writes).map_err(|e| {
        error!("Failed to create bracket for tournament {tournament_id}: {e}");
        EngineError::Internal("an error occurred while generating the bracket".to_string())
    })?;
    info!(
        "Bracket generated for tournament {tournament_id} with {} participants",
        participants.len()
    );

    // Byes never receive a confirmation event; advance their winners now.
    let bye_matches = store.query(
        &tournament_matches_collection(tournament_id),
        &[Filter::eq("round", 1), Filter::eq("status", "completed")],
    )?;
    for (match_id, doc) in bye_matches {
        let bye: TournamentMatch = from_doc(doc)?;
        if let (Some(winner_id), Some(next_match_id)) = (&bye.winner_id, &bye.next_match_id) {
            advance_winner(store, tournament_id, &match_id, winner_id, next_match_id);
        }
    }

    Ok(GenerateOutcome {
        success: true,
        message: "Bracket generated successfully.".to_string(),
    })
}
