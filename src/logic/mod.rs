//! Pure engine logic: rating math, stats aggregation, bracket layout.

mod bracket;
mod rating;
mod stats;

pub use bracket::{layout_bracket, total_rounds};
pub use rating::{elo_update, sportsmanship_average, DEFAULT_K_FACTOR};
pub use stats::{aggregate_stats, ProfileDelta};
