//! Participants: seed-indexed payloads and the roster that maps seeds to them.

use crate::models::track::Track;
use serde::{Deserialize, Serialize};

/// 1-based seed position. Seeds above the participant count denote byes.
pub type Seed = usize;

/// A real bracket entrant: its seed and the opaque payload looked up for it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant<P> {
    pub seed: Seed,
    pub payload: P,
}

impl<P> Participant<P> {
    pub fn new(seed: Seed, payload: P) -> Self {
        Self { seed, payload }
    }
}

/// Seed → payload lookup. `None` entries are missing payloads and count as byes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Roster<P> {
    entries: Vec<Option<P>>,
}

impl<P> Default for Roster<P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<P> Roster<P> {
    /// Every entry present; seed `i` is `payloads[i - 1]`.
    pub fn new(payloads: Vec<P>) -> Self {
        Self {
            entries: payloads.into_iter().map(Some).collect(),
        }
    }

    /// Entries that may be missing. Seeds stay positional.
    pub fn from_entries(entries: Vec<Option<P>>) -> Self {
        Self { entries }
    }

    /// Number of seed positions (the participant count `N`), present or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Payload for `seed`, or `None` for a bye (seed out of range or missing payload).
    pub fn get(&self, seed: Seed) -> Option<&P> {
        seed.checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .and_then(Option::as_ref)
    }

    pub fn is_present(&self, seed: Seed) -> bool {
        self.get(seed).is_some()
    }

    /// Resolve a slot to a participant, cloning the payload.
    pub fn participant(&self, slot: Option<Seed>) -> Option<Participant<P>>
    where
        P: Clone,
    {
        let seed = slot?;
        self.get(seed).map(|p| Participant::new(seed, p.clone()))
    }

    /// Present payloads in seed order.
    pub fn participants(&self) -> Vec<Participant<P>>
    where
        P: Clone,
    {
        (1..=self.len())
            .filter_map(|seed| self.participant(Some(seed)))
            .collect()
    }
}

impl Roster<Track> {
    /// Tracks with an empty name become missing entries, keeping their seed position.
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self::from_entries(
            tracks
                .into_iter()
                .map(|t| if t.is_present() { Some(t) } else { None })
                .collect(),
        )
    }
}
