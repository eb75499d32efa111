//! Initial ordering of entries before seeds are assigned (seed 1 = first entry).

use crate::models::Track;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How entries are ordered before the bracket is generated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingStrategy {
    /// Keep the given order: the first entry is the top seed.
    #[default]
    Ranked,
    /// Shuffle entries so seeds are random.
    Randomized,
}

impl SeedingStrategy {
    pub fn apply<T>(self, entries: &mut [T]) {
        self.apply_with_rng(entries, &mut rand::thread_rng());
    }

    pub fn apply_with_rng<T, R: Rng + ?Sized>(self, entries: &mut [T], rng: &mut R) {
        match self {
            SeedingStrategy::Ranked => {}
            SeedingStrategy::Randomized => entries.shuffle(rng),
        }
    }
}

/// Most popular first; ties keep playlist order. Top seeds are the ones that get byes.
pub fn rank_by_popularity(tracks: &mut [Track]) {
    tracks.sort_by_key(|t| std::cmp::Reverse(t.popularity_or_default()));
}

/// Order tracks for seeding: ranked tracks go by popularity, randomized ones are shuffled.
pub fn seed_tracks(mut tracks: Vec<Track>, strategy: SeedingStrategy) -> Vec<Track> {
    match strategy {
        SeedingStrategy::Ranked => rank_by_popularity(&mut tracks),
        SeedingStrategy::Randomized => strategy.apply(&mut tracks),
    }
    tracks
}
