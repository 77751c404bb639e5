//! Registration handlers: keep the tournament's denormalized participant count
//! in step with its registrations subcollection.

use log::{error, info};

use crate::models::EngineError;
use crate::store::{tournament_path, DocumentStore, Patch};

/// Invoked when `tournaments/{tid}/registrations/{user_id}` is created.
pub fn on_registration_created(
    store: &dyn DocumentStore,
    tournament_id: &str,
    user_id: &str,
) -> Result<(), EngineError> {
    bump_participant_count(store, tournament_id, user_id, 1)
}

/// Invoked when `tournaments/{tid}/registrations/{user_id}` is deleted.
pub fn on_registration_deleted(
    store: &dyn DocumentStore,
    tournament_id: &str,
    user_id: &str,
) -> Result<(), EngineError> {
    bump_participant_count(store, tournament_id, user_id, -1)
}

fn bump_participant_count(
    store: &dyn DocumentStore,
    tournament_id: &str,
    user_id: &str,
    delta: i64,
) -> Result<(), EngineError> {
    let patch = Patch::new().increment("participantCount", delta);
    match store.update(&tournament_path(tournament_id), patch) {
        Ok(()) => info!(
            "Adjusted participant count by {delta} for tournament {tournament_id} (user {user_id})"
        ),
        Err(e) => error!("Failed to adjust participant count for tournament {tournament_id}: {e}"),
    }
    Ok(())
}
