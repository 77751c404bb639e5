//! Data structures for the ranking engine: profiles, matches, tournaments, errors.

mod error;
mod match_record;
mod profile;
mod tournament;

pub use error::EngineError;
pub use match_record::{
    is_first_confirmation, MatchRecord, PeerRating, Punctuality, ResultStatus, TeamMember, Winner,
};
pub use profile::{PlayerProfile, DEFAULT_ELO_RATING, DEFAULT_SPORTSMANSHIP};
pub use tournament::{MatchStatus, Tournament, TournamentMatch, TournamentStatus};
