//! Playlist bracket web app: library with models and bracket logic.

pub mod config;
pub mod logic;
pub mod models;

pub use config::ServerConfig;
pub use logic::{
    build_playlist_export, compute_placements, compute_placements_by_key, default_playlist_name,
    drive_auto_resolution, generate_bracket, placements_to_csv, rank_by_popularity,
    scheduled_ticket, seed_tracks, spawn_auto_resolution, transition, BracketEvent,
    CurrentMatch, Event, Notice, PlaylistExport, Progress, ResolveTicket, RoundController,
    RoundOutput, SeedingStrategy, Transition, DEFAULT_AUTO_RESOLVE_DELAY,
};
pub use models::{
    BracketError, BracketPlan, BracketSession, BracketState, Match, Participant, Roster, Seed,
    SessionId, SessionSnapshot, Side, Slot, Track, DEFAULT_POPULARITY,
};
