//! BracketSession: one user's bracket over a set of tracks.

use crate::logic::{
    build_playlist_export, generate_bracket, placements_to_csv, seed_tracks, BracketEvent,
    CurrentMatch, PlaylistExport, ResolveTicket, RoundController, RoundOutput, SeedingStrategy,
    DEFAULT_AUTO_RESOLVE_DELAY,
};
use crate::models::bracket::{BracketPlan, BracketState, Side};
use crate::models::error::BracketError;
use crate::models::participant::{Participant, Roster};
use crate::models::track::Track;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Unique identifier for a bracket session.
pub type SessionId = Uuid;

/// A bracket over a playlist: the tracks as given, how they were seeded, and the controller.
#[derive(Clone, Debug)]
pub struct BracketSession {
    pub id: SessionId,
    /// Playlist name to export under, if the user chose one.
    pub name: Option<String>,
    pub seeding: SeedingStrategy,
    /// Tracks in the order they were supplied (before seeding).
    pub tracks: Vec<Track>,
    pub controller: RoundController<Track>,
}

impl BracketSession {
    /// Seed `tracks`, generate the bracket and start round 0.
    pub fn new(tracks: Vec<Track>, seeding: SeedingStrategy) -> Self {
        Self::with_auto_resolve_delay(tracks, seeding, DEFAULT_AUTO_RESOLVE_DELAY)
    }

    pub fn with_auto_resolve_delay(
        tracks: Vec<Track>,
        seeding: SeedingStrategy,
        delay: Duration,
    ) -> Self {
        let (plan, roster) = Self::build(&tracks, seeding);
        Self {
            id: Uuid::new_v4(),
            name: None,
            seeding,
            tracks,
            controller: RoundController::with_auto_resolve_delay(plan, roster, delay),
        }
    }

    fn build(tracks: &[Track], seeding: SeedingStrategy) -> (BracketPlan, Roster<Track>) {
        let seeded = seed_tracks(tracks.to_vec(), seeding);
        (generate_bracket(seeded.len()), Roster::from_tracks(seeded))
    }

    /// Start over, optionally with new tracks or a new seeding strategy.
    pub fn reset(
        &mut self,
        tracks: Option<Vec<Track>>,
        seeding: Option<SeedingStrategy>,
    ) -> Vec<BracketEvent<Track>> {
        if let Some(tracks) = tracks {
            self.tracks = tracks;
        }
        if let Some(seeding) = seeding {
            self.seeding = seeding;
        }
        let (plan, roster) = Self::build(&self.tracks, self.seeding);
        self.controller.reset(plan, roster)
    }

    /// Pick by raw slot index (0 = home, 1 = away).
    pub fn pick(&mut self, slot: u8) -> Result<Vec<BracketEvent<Track>>, BracketError> {
        let side = Side::try_from(slot)?;
        self.controller.pick(side)
    }

    pub fn resolve(&mut self, ticket: ResolveTicket) -> Vec<BracketEvent<Track>> {
        self.controller.resolve(ticket)
    }

    pub fn placements(&self) -> Vec<Participant<Track>> {
        self.controller.placements()
    }

    /// Export payload under `name`, falling back to the session name, then the default.
    pub fn export(&self, name: Option<&str>) -> Result<PlaylistExport, BracketError> {
        build_playlist_export(name.or(self.name.as_deref()), &self.placements())
    }

    pub fn placements_csv(&self) -> Result<String, BracketError> {
        placements_to_csv(&self.placements())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let c = &self.controller;
        SessionSnapshot {
            id: self.id,
            name: self.name.clone(),
            seeding: self.seeding,
            state: c.state(),
            round: c.round(),
            round_count: c.round_count(),
            match_index: c.match_index(),
            plan: c.plan().clone(),
            current_match: c.current_match(),
            pending: c.pending_ticket(),
            champion: c.champion(),
            rounds: c.round_outputs(),
            placements: c.placements(),
        }
    }
}

/// API view of a session.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub name: Option<String>,
    pub seeding: SeedingStrategy,
    pub state: BracketState,
    pub round: usize,
    pub round_count: usize,
    pub match_index: usize,
    pub plan: BracketPlan,
    pub current_match: Option<CurrentMatch<Track>>,
    pub pending: Option<ResolveTicket>,
    pub champion: Option<Participant<Track>>,
    pub rounds: Vec<RoundOutput<Track>>,
    pub placements: Vec<Participant<Track>>,
}
