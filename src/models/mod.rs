//! Data structures for the bracket: tracks, participants, plans, sessions, errors.

mod bracket;
mod error;
mod participant;
mod session;
mod track;

pub use bracket::{BracketPlan, BracketState, Match, Side, Slot};
pub use error::BracketError;
pub use participant::{Participant, Roster, Seed};
pub use session::{BracketSession, SessionId, SessionSnapshot};
pub use track::{Track, DEFAULT_POPULARITY};
