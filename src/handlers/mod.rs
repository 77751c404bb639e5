//! Event-triggered handlers and the synchronous bracket-generation operation.
//!
//! Each event handler takes explicit before/after snapshots plus path
//! parameters, so the core stays independent of the delivery mechanism and is
//! testable with synthetic inputs. Handlers must stay idempotent under
//! redelivery; the first-confirmation gate is that mechanism.

mod advance;
mod confirmation;
mod generate;
mod registration;

pub use advance::{advance_winner, on_tournament_match_updated};
pub use confirmation::on_match_updated;
pub use generate::{generate_bracket, GenerateOutcome};
pub use registration::{on_registration_created, on_registration_deleted};
