//! Match-updated handler: applies all player stat mutations exactly once when a
//! match result first becomes confirmed.

use std::collections::HashMap;

use log::{error, info};

use crate::logic::aggregate_stats;
use crate::models::{is_first_confirmation, EngineError, MatchRecord, PlayerProfile};
use crate::store::{from_doc, user_path, DocumentStore, Write};

/// Invoked by the delivery layer on every update to `matches/{match_id}`.
///
/// No-ops unless the snapshots cross into `confirmed` for the first time; a
/// redelivered event whose before-snapshot is already confirmed changes
/// nothing. Profile reads happen outside any transaction; all mutations commit
/// as one atomic batch. A failed commit is logged and swallowed; redelivery,
/// if any, is the delivery layer's policy.
pub fn on_match_updated(
    store: &dyn DocumentStore,
    match_id: &str,
    before: &MatchRecord,
    after: &MatchRecord,
) -> Result<(), EngineError> {
    if !is_first_confirmation(before.result_status, after.result_status) {
        return Ok(());
    }
    info!("Match {match_id} confirmed, processing player stats");

    let mut profiles: HashMap<String, PlayerProfile> = HashMap::new();
    for id in after.participant_ids() {
        if let Some(doc) = store.get(&user_path(&id))? {
            profiles.insert(id, from_doc(doc)?);
        }
    }

    if after.decisive_one_v_one().is_none() {
        info!("Match {match_id} is a draw or not 1v1, skipping Elo update");
    }

    let deltas = aggregate_stats(after, &profiles);
    if deltas.is_empty() {
        info!("Match {match_id}: no profile changes to write");
        return Ok(());
    }

    let writes: Vec<Write> = deltas
        .iter()
        .map(|(id, delta)| Write::Update {
            path: user_path(id),
            patch: delta.to_patch(),
        })
        .collect();
    let players = writes.len();
    match store.batch_write(writes) {
        Ok(()) => info!("Updated stats for {players} player(s) in match {match_id}"),
        Err(e) => error!("Failed to commit stat updates for match {match_id}: {e}"),
    }
    Ok(())
}
