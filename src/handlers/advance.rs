//! Bracket advancer: moves a confirmed winner into the next round's match.

use log::{error, info, warn};
use serde_json::json;

use crate::models::{is_first_confirmation, EngineError, TournamentMatch};
use crate::store::{
    from_doc, tournament_match_path, DocumentStore, Patch, StoreError, TransactionScope,
};

/// Invoked by the delivery layer on every update to
/// `tournaments/{tid}/matches/{match_id}`.
///
/// Same first-confirmation gate as the stats handler. The final (no
/// `next_match_id`) and matches without a winner are logged no-ops.
pub fn on_tournament_match_updated(
    store: &dyn DocumentStore,
    tournament_id: &str,
    match_id: &str,
    before: &TournamentMatch,
    after: &TournamentMatch,
) -> Result<(), EngineError> {
    if !is_first_confirmation(before.result_status, after.result_status) {
        info!("Tournament match {match_id} not newly confirmed, skipping advancement");
        return Ok(());
    }
    let (winner_id, next_match_id) = match (&after.winner_id, &after.next_match_id) {
        (Some(w), Some(n)) => (w.as_str(), n.as_str()),
        _ => {
            info!("Match {match_id} has no winner or next match, nothing to advance");
            return Ok(());
        }
    };
    advance_winner(store, tournament_id, match_id, winner_id, next_match_id);
    Ok(())
}

/// Place `winner_id` into the first open slot of `next_match_id`, inside one
/// isolated transaction so sibling matches confirming concurrently serialize
/// and never land in the same slot. A next match that is already full is an
/// invariant violation: logged, nothing written. Transaction failures are
/// logged and swallowed.
///
/// Also called directly by the bracket generator for byes, which never receive
/// a confirmation event.
pub fn advance_winner(
    store: &dyn DocumentStore,
    tournament_id: &str,
    from_match_id: &str,
    winner_id: &str,
    next_match_id: &str,
) {
    info!("Advancing winner {winner_id} from match {from_match_id} to match {next_match_id}");
    let path = tournament_match_path(tournament_id, next_match_id);

    let mut scheduled = false;
    let result = store.run_transaction(&mut |tx: &mut dyn TransactionScope| {
        let doc = tx
            .get(&path)?
            .ok_or_else(|| StoreError::NotFound(path.clone()))?;
        let next: TournamentMatch = from_doc(doc)?;

        scheduled = false;
        let mut patch = Patch::new();
        let both_filled = if next.player1_id.is_none() {
            patch = patch.set("player1Id", json!(winner_id));
            next.player2_id.is_some()
        } else if next.player2_id.is_none() {
            patch = patch.set("player2Id", json!(winner_id));
            true
        } else {
            warn!(
                "Match {next_match_id} already has two players, dropping advancement from {from_match_id}"
            );
            return Ok(());
        };

        if both_filled {
            patch = patch.set("status", json!("scheduled"));
            scheduled = true;
        }
        tx.update(&path, patch);
        Ok(())
    });

    match result {
        Ok(()) => {
            if scheduled {
                info!("Match {next_match_id} is now scheduled");
            }
        }
        Err(e) => error!("Failed to advance winner from match {from_match_id}: {e}"),
    }
}
