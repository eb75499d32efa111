//! Placement list: best-to-worst ranking derived from round history.

use crate::models::Participant;
use std::collections::HashSet;
use std::hash::Hash;

/// One round's entries in slot order; `None` is a bye or missing payload.
pub type RoundOutput<P> = Vec<Option<Participant<P>>>;

/// Rank participants from the most advanced round down, deduplicated by seed.
///
/// `rounds` is the initial seeding followed by each completed round's winners, so the
/// champion comes first, then the runner-up, then earlier losers. Participants knocked
/// out in the same round keep their slot order; that is not a strength ranking.
/// Works on partial history.
pub fn compute_placements<P: Clone>(rounds: &[RoundOutput<P>]) -> Vec<Participant<P>> {
    compute_placements_by_key(rounds, |p| p.seed)
}

/// Same as [`compute_placements`] with a caller-chosen identity (e.g. track URI).
pub fn compute_placements_by_key<P, K, F>(rounds: &[RoundOutput<P>], key: F) -> Vec<Participant<P>>
where
    P: Clone,
    K: Eq + Hash,
    F: Fn(&Participant<P>) -> K,
{
    let mut seen = HashSet::new();
    let mut placements = Vec::new();
    for round in rounds.iter().rev() {
        for participant in round.iter().flatten() {
            if seen.insert(key(participant)) {
                placements.push(participant.clone());
            }
        }
    }
    placements
}
