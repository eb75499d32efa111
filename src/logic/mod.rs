//! Bracket logic: generation, round control, placements, seeding, delayed byes, export.

mod auto_resolve;
mod controller;
mod export;
mod generator;
mod placements;
mod seeding;

pub use auto_resolve::{drive_auto_resolution, scheduled_ticket, spawn_auto_resolution};
pub use controller::{
    transition, BracketEvent, CurrentMatch, Event, Notice, Progress, ResolveTicket,
    RoundController, Transition, DEFAULT_AUTO_RESOLVE_DELAY,
};
pub use export::{build_playlist_export, default_playlist_name, placements_to_csv, PlaylistExport};
pub use generator::generate_bracket;
pub use placements::{compute_placements, compute_placements_by_key, RoundOutput};
pub use seeding::{rank_by_popularity, seed_tracks, SeedingStrategy};
