//! Player ranking and tournament bracket engine: models, pure logic, store
//! seam, and the handlers wired to document-change events.

pub mod handlers;
pub mod logic;
pub mod models;
pub mod store;

pub use handlers::{
    advance_winner, generate_bracket, on_match_updated, on_registration_created,
    on_registration_deleted, on_tournament_match_updated, GenerateOutcome,
};
pub use logic::{
    aggregate_stats, elo_update, layout_bracket, sportsmanship_average, total_rounds,
    ProfileDelta, DEFAULT_K_FACTOR,
};
pub use models::{
    is_first_confirmation, EngineError, MatchRecord, MatchStatus, PeerRating, PlayerProfile,
    Punctuality, ResultStatus, TeamMember, Tournament, TournamentMatch, TournamentStatus, Winner,
    DEFAULT_ELO_RATING, DEFAULT_SPORTSMANSHIP,
};
pub use store::{DocumentStore, MemoryStore, StoreError};
