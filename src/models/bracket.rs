//! Bracket plan, matches, sides and the controller state.

use crate::models::error::BracketError;
use crate::models::participant::Seed;
use serde::{Deserialize, Serialize};

/// One bracket position: a seed, or `None` for a bye.
pub type Slot = Option<Seed>;

/// Which side of a match. Serialized as `0` / `1` on the API through [`Side::index`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Home,
    Away,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = BracketError;

    fn try_from(slot: u8) -> Result<Self, Self::Error> {
        match slot {
            0 => Ok(Side::Home),
            1 => Ok(Side::Away),
            other => Err(BracketError::InvalidSlot(other)),
        }
    }
}

/// An ordered pair of slots.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub home: Slot,
    pub away: Slot,
}

impl Match {
    pub fn new(home: Slot, away: Slot) -> Self {
        Self { home, away }
    }

    pub fn slot(&self, side: Side) -> Slot {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    /// Flattened `[home, away]`.
    pub fn slots(&self) -> [Slot; 2] {
        [self.home, self.away]
    }

    /// Rebuild matches from a flattened slot list (winner of match `i` sits in slot `i`).
    pub fn pair_up(slots: &[Slot]) -> Vec<Match> {
        slots
            .chunks_exact(2)
            .map(|pair| Match::new(pair[0], pair[1]))
            .collect()
    }
}

/// Immutable first-round structure of a single-elimination bracket.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketPlan {
    /// Number of participants the plan was generated for.
    pub participant_count: usize,
    pub round_count: usize,
    /// `2^round_count` for two or more participants, else 0.
    pub bracket_size: usize,
    /// True when there is nothing to play (fewer than two participants).
    pub complete: bool,
    /// First round only; later rounds are derived from picks.
    pub matches: Vec<Match>,
}

impl BracketPlan {
    pub fn required_byes(&self) -> usize {
        self.bracket_size.saturating_sub(self.participant_count)
    }

    /// Matches played in round `round` (0-indexed), or 0 past the final.
    pub fn matches_in_round(&self, round: usize) -> usize {
        if round >= self.round_count {
            return 0;
        }
        self.bracket_size >> (round + 1)
    }

    /// First-round matches flattened into slot order.
    pub fn slots(&self) -> Vec<Slot> {
        self.matches.iter().flat_map(|m| m.slots()).collect()
    }
}

/// Where the round controller stands.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketState {
    /// Current match has two real participants; waiting for a pick.
    #[default]
    AwaitingPick,
    /// Current match has one real participant; a resolution is scheduled.
    AutoResolving,
    /// Every match of the round is decided; about to roll over.
    RoundComplete,
    /// Final decided.
    TournamentComplete,
}
