//! Integration tests for match confirmation: stat aggregation, the exactly-once
//! gate, and edge cases around draws, team matches, and missing profiles.

use std::collections::HashMap;

use matchpoint_engine::logic::aggregate_stats;
use matchpoint_engine::models::{
    MatchRecord, PeerRating, PlayerProfile, Punctuality, ResultStatus, TeamMember, Winner,
};
use matchpoint_engine::store::{
    from_doc, to_doc, user_path, DocumentStore, MemoryStore, Patch, StoreError, Write,
};
use matchpoint_engine::on_match_updated;

fn seed_profile(store: &MemoryStore, id: &str, profile: &PlayerProfile) {
    store.set(&user_path(id), to_doc(profile).unwrap());
}

fn profile(store: &MemoryStore, id: &str) -> PlayerProfile {
    from_doc(store.get(&user_path(id)).unwrap().unwrap()).unwrap()
}

fn one_v_one(a: &str, b: &str, winner: Option<Winner>) -> MatchRecord {
    MatchRecord {
        team1_players: vec![TeamMember::new(a)],
        team2_players: vec![TeamMember::new(b)],
        winner,
        result_status: ResultStatus::Confirmed,
        player_ratings: Vec::new(),
    }
}

fn pending(mut record: MatchRecord) -> MatchRecord {
    record.result_status = ResultStatus::Pending;
    record
}

#[test]
fn confirmed_one_v_one_updates_elo_and_counters() {
    let store = MemoryStore::new();
    seed_profile(&store, "alice", &PlayerProfile::new());
    seed_profile(&store, "bob", &PlayerProfile::new());

    let after = one_v_one("alice", "bob", Some(Winner::Team1));
    on_match_updated(&store, "m1", &pending(after.clone()), &after).unwrap();

    let alice = profile(&store, "alice");
    let bob = profile(&store, "bob");
    assert_eq!(alice.elo_rating, 1216);
    assert_eq!(alice.matches_won, 1);
    assert_eq!(alice.matches_lost, 0);
    assert_eq!(alice.total_matches_played, 1);
    assert_eq!(bob.elo_rating, 1184);
    assert_eq!(bob.matches_lost, 1);
    assert_eq!(bob.matches_won, 0);
    assert_eq!(bob.total_matches_played, 1);
}

#[test]
fn redelivered_confirmation_is_a_noop() {
    let store = MemoryStore::new();
    seed_profile(&store, "alice", &PlayerProfile::new());
    seed_profile(&store, "bob", &PlayerProfile::new());

    let after = one_v_one("alice", "bob", Some(Winner::Team1));
    on_match_updated(&store, "m1", &pending(after.clone()), &after).unwrap();
    // Redelivery: the before snapshot is already confirmed.
    on_match_updated(&store, "m1", &after.clone(), &after).unwrap();

    let alice = profile(&store, "alice");
    assert_eq!(alice.elo_rating, 1216);
    assert_eq!(alice.matches_won, 1);
    assert_eq!(alice.total_matches_played, 1);
}

#[test]
fn unconfirmed_update_changes_nothing() {
    let store = MemoryStore::new();
    seed_profile(&store, "alice", &PlayerProfile::new());
    seed_profile(&store, "bob", &PlayerProfile::new());

    let mut after = one_v_one("alice", "bob", Some(Winner::Team1));
    after.result_status = ResultStatus::Pending;
    let before = MatchRecord {
        result_status: ResultStatus::NoResult,
        ..after.clone()
    };
    on_match_updated(&store, "m1", &before, &after).unwrap();

    assert_eq!(profile(&store, "alice"), PlayerProfile::new());
    assert_eq!(profile(&store, "bob"), PlayerProfile::new());
}

#[test]
fn draw_counts_the_match_but_skips_rating() {
    let store = MemoryStore::new();
    seed_profile(&store, "alice", &PlayerProfile::new());
    seed_profile(&store, "bob", &PlayerProfile::new());

    let after = one_v_one("alice", "bob", Some(Winner::Draw));
    on_match_updated(&store, "m1", &pending(after.clone()), &after).unwrap();

    for id in ["alice", "bob"] {
        let p = profile(&store, id);
        assert_eq!(p.total_matches_played, 1);
        assert_eq!(p.elo_rating, 1200);
        assert_eq!(p.matches_won, 0);
        assert_eq!(p.matches_lost, 0);
    }
}

#[test]
fn team_match_counts_everyone_but_skips_rating() {
    let store = MemoryStore::new();
    for id in ["a", "b", "c", "d"] {
        seed_profile(&store, id, &PlayerProfile::new());
    }

    let after = MatchRecord {
        team1_players: vec![TeamMember::new("a"), TeamMember::new("b")],
        team2_players: vec![TeamMember::new("c"), TeamMember::new("d")],
        winner: Some(Winner::Team1),
        result_status: ResultStatus::Confirmed,
        player_ratings: Vec::new(),
    };
    on_match_updated(&store, "m1", &pending(after.clone()), &after).unwrap();

    for id in ["a", "b", "c", "d"] {
        let p = profile(&store, id);
        assert_eq!(p.total_matches_played, 1);
        assert_eq!(p.elo_rating, 1200);
        assert_eq!(p.matches_won, 0);
        assert_eq!(p.matches_lost, 0);
    }
}

#[test]
fn multiple_ratings_still_count_one_match() {
    let store = MemoryStore::new();
    seed_profile(&store, "alice", &PlayerProfile::new());
    seed_profile(&store, "bob", &PlayerProfile::new());

    let mut after = one_v_one("alice", "bob", Some(Winner::Draw));
    after.player_ratings = vec![
        PeerRating {
            rated_user_id: "alice".to_string(),
            punctuality: Punctuality::OnTime,
            sportsmanship: 8.0,
        },
        PeerRating {
            rated_user_id: "alice".to_string(),
            punctuality: Punctuality::OnTime,
            sportsmanship: 6.0,
        },
    ];
    on_match_updated(&store, "m1", &pending(after.clone()), &after).unwrap();

    let alice = profile(&store, "alice");
    assert_eq!(alice.total_matches_played, 1);
    // Both ratings fold in against the pre-match count of 0: the second one
    // fully replaces the first within the same match.
    assert_eq!(alice.sportsmanship_score, 6.0);
}

#[test]
fn sportsmanship_rolls_across_matches() {
    let store = MemoryStore::new();
    seed_profile(&store, "alice", &PlayerProfile::new());
    seed_profile(&store, "bob", &PlayerProfile::new());

    let mut first = one_v_one("alice", "bob", Some(Winner::Team1));
    first.player_ratings = vec![PeerRating {
        rated_user_id: "alice".to_string(),
        punctuality: Punctuality::OnTime,
        sportsmanship: 8.0,
    }];
    on_match_updated(&store, "m1", &pending(first.clone()), &first).unwrap();
    assert_eq!(profile(&store, "alice").sportsmanship_score, 8.0);

    let mut second = one_v_one("alice", "bob", Some(Winner::Team2));
    second.player_ratings = vec![PeerRating {
        rated_user_id: "alice".to_string(),
        punctuality: Punctuality::Late,
        sportsmanship: 6.0,
    }];
    on_match_updated(&store, "m2", &pending(second.clone()), &second).unwrap();
    assert_eq!(profile(&store, "alice").sportsmanship_score, 7.0);
}

#[test]
fn no_show_rating_increments_reliability_counter() {
    let store = MemoryStore::new();
    seed_profile(&store, "alice", &PlayerProfile::new());
    seed_profile(&store, "bob", &PlayerProfile::new());

    let mut after = one_v_one("alice", "bob", Some(Winner::Team2));
    after.player_ratings = vec![
        PeerRating {
            rated_user_id: "alice".to_string(),
            punctuality: Punctuality::NoShow,
            sportsmanship: 2.0,
        },
        PeerRating {
            rated_user_id: "bob".to_string(),
            punctuality: Punctuality::OnTime,
            sportsmanship: 9.0,
        },
    ];
    on_match_updated(&store, "m1", &pending(after.clone()), &after).unwrap();

    assert_eq!(profile(&store, "alice").no_shows, 1);
    assert_eq!(profile(&store, "bob").no_shows, 0);
}

#[test]
fn missing_profile_is_skipped_and_counterpart_proceeds() {
    let store = MemoryStore::new();
    // Only alice exists; bob has no profile document.
    seed_profile(&store, "alice", &PlayerProfile::new());

    let mut after = one_v_one("alice", "bob", Some(Winner::Team1));
    after.player_ratings = vec![PeerRating {
        rated_user_id: "bob".to_string(),
        punctuality: Punctuality::NoShow,
        sportsmanship: 1.0,
    }];
    on_match_updated(&store, "m1", &pending(after.clone()), &after).unwrap();

    let alice = profile(&store, "alice");
    assert_eq!(alice.elo_rating, 1216);
    assert_eq!(alice.matches_won, 1);
    assert_eq!(alice.total_matches_played, 1);
    assert!(store.get(&user_path("bob")).unwrap().is_none());
}

#[test]
fn ratings_for_non_participants_are_ignored() {
    let store = MemoryStore::new();
    seed_profile(&store, "alice", &PlayerProfile::new());
    seed_profile(&store, "bob", &PlayerProfile::new());
    seed_profile(&store, "stranger", &PlayerProfile::new());

    let mut after = one_v_one("alice", "bob", Some(Winner::Draw));
    after.player_ratings = vec![PeerRating {
        rated_user_id: "stranger".to_string(),
        punctuality: Punctuality::NoShow,
        sportsmanship: 1.0,
    }];
    on_match_updated(&store, "m1", &pending(after.clone()), &after).unwrap();

    assert_eq!(profile(&store, "stranger"), PlayerProfile::new());
}

#[test]
fn aggregator_emits_only_changed_fields() {
    let mut profiles = HashMap::new();
    profiles.insert("alice".to_string(), PlayerProfile::new());
    profiles.insert("bob".to_string(), PlayerProfile::new());

    let record = one_v_one("alice", "bob", Some(Winner::Draw));
    let deltas = aggregate_stats(&record, &profiles);

    let alice = &deltas["alice"];
    assert_eq!(alice.total_matches_played, Some(1));
    assert_eq!(alice.elo_rating, None);
    assert_eq!(alice.matches_won, None);
    assert_eq!(alice.matches_lost, None);
    assert_eq!(alice.no_shows, None);
    assert_eq!(alice.sportsmanship_score, None);
}

#[test]
fn duplicate_roster_entry_counts_once() {
    let mut profiles = HashMap::new();
    profiles.insert("alice".to_string(), PlayerProfile::new());
    profiles.insert("bob".to_string(), PlayerProfile::new());
    profiles.insert("carol".to_string(), PlayerProfile::new());

    // alice listed on both sides of a team match (bad input, still exactly one
    // appearance).
    let record = MatchRecord {
        team1_players: vec![TeamMember::new("alice"), TeamMember::new("bob")],
        team2_players: vec![TeamMember::new("alice"), TeamMember::new("carol")],
        winner: None,
        result_status: ResultStatus::Confirmed,
        player_ratings: Vec::new(),
    };
    let deltas = aggregate_stats(&record, &profiles);
    assert_eq!(deltas["alice"].total_matches_played, Some(1));
}

#[test]
fn failing_batch_leaves_no_partial_writes() {
    let store = MemoryStore::new();
    seed_profile(&store, "alice", &PlayerProfile::new());

    // Second update targets a document that does not exist; the whole batch
    // must be rejected, including the first update.
    let writes = vec![
        Write::Update {
            path: user_path("alice"),
            patch: Patch::new().increment("eloRating", 32),
        },
        Write::Update {
            path: user_path("ghost"),
            patch: Patch::new().increment("eloRating", -32),
        },
    ];
    let err = store.batch_write(writes).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(profile(&store, "alice").elo_rating, 1200);
}
