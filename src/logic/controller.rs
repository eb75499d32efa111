//! Round controller: steps through a bracket one match at a time.
//!
//! The progress of a bracket is a plain value ([`Progress`]) changed only by the pure
//! [`transition`] function. [`RoundController`] owns the plan, the roster and the
//! progress, and after every accepted event keeps evaluating until the bracket is
//! waiting on something: rounds roll over, byes resolve (at once, or later through a
//! [`ResolveTicket`] when a presentation delay is configured).

use crate::logic::placements::{compute_placements, RoundOutput};
use crate::models::{
    BracketError, BracketPlan, BracketState, Match, Participant, Roster, Side, Slot,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay before a bye match resolves itself, so a UI can show the skip.
pub const DEFAULT_AUTO_RESOLVE_DELAY: Duration = Duration::from_millis(200);

/// Captured controller position for a scheduled bye resolution.
///
/// Only the ticket matching the controller's pending one may resolve; anything else
/// (after a pick, rollover or reset) is stale and ignored.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveTicket {
    pub epoch: u64,
    pub round: usize,
    pub match_index: usize,
    /// Side holding the real participant.
    pub side: Side,
}

/// Input to [`transition`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    Pick(Side),
    AutoResolve(ResolveTicket),
    Rollover,
}

/// What a transition did, in seed terms.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notice {
    MatchDecided {
        round: usize,
        match_index: usize,
        winner: Slot,
    },
    RoundComplete {
        round: usize,
        output: Vec<Slot>,
    },
    TournamentComplete {
        champion: Slot,
    },
}

/// Mutable bracket progress.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub state: BracketState,
    pub round: usize,
    pub round_count: usize,
    /// Index of the current match within the round.
    pub match_index: usize,
    /// Current round's input, flattened (match `i` is `slots[2i]` vs `slots[2i + 1]`).
    pub slots: Vec<Slot>,
    /// Winners recorded so far in the current round.
    pub output: Vec<Slot>,
    /// Initial seeding followed by each completed round's output.
    pub history: Vec<Vec<Slot>>,
    pub pending: Option<ResolveTicket>,
    /// Bumped on every recorded decision and reset.
    pub epoch: u64,
}

impl Progress {
    /// Fresh progress for `plan`, already evaluated up to the first decision point.
    pub fn start<P>(plan: &BracketPlan, roster: &Roster<P>, epoch: u64) -> (Progress, Vec<Notice>) {
        let mut notices = Vec::new();
        if plan.complete {
            let seeds: Vec<Slot> = (1..=plan.participant_count).map(Some).collect();
            let progress = Progress {
                state: BracketState::TournamentComplete,
                history: vec![seeds],
                epoch,
                ..Progress::default()
            };
            return (progress, notices);
        }
        let slots = plan.slots();
        let mut progress = Progress {
            state: BracketState::AwaitingPick,
            round_count: plan.round_count,
            history: vec![slots.clone()],
            slots,
            epoch,
            ..Progress::default()
        };
        settle(roster, &mut progress, &mut notices);
        (progress, notices)
    }

    pub fn current_match(&self) -> Option<Match> {
        match self.state {
            BracketState::AwaitingPick | BracketState::AutoResolving => {
                let i = self.match_index * 2;
                Some(Match::new(self.slots[i], self.slots[i + 1]))
            }
            BracketState::RoundComplete | BracketState::TournamentComplete => None,
        }
    }

    /// Sole entry of the final round, once decided.
    pub fn champion(&self) -> Slot {
        if self.state != BracketState::TournamentComplete {
            return None;
        }
        match self.history.last() {
            Some(last) if last.len() == 1 => last[0],
            _ => None,
        }
    }
}

/// Result of a transition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transition {
    pub progress: Progress,
    pub notices: Vec<Notice>,
}

/// Apply `event` to `progress`. Pure: the input is left untouched.
///
/// A stale [`Event::AutoResolve`] is not an error; it returns the progress unchanged
/// with no notices.
pub fn transition<P>(
    roster: &Roster<P>,
    progress: &Progress,
    event: Event,
) -> Result<Transition, BracketError> {
    let mut next = progress.clone();
    let mut notices = Vec::new();

    match event {
        Event::Pick(side) => {
            let current = next.current_match().ok_or(BracketError::InvalidState)?;
            let slot = current.slot(side);
            if !slot.is_some_and(|seed| roster.is_present(seed)) {
                return Err(BracketError::InvalidState);
            }
            record(roster, &mut next, slot, &mut notices);
        }
        Event::AutoResolve(ticket) => {
            if next.state != BracketState::AutoResolving || next.pending != Some(ticket) {
                log::trace!("Dropping stale auto-resolution {:?}", ticket);
                return Ok(Transition {
                    progress: next,
                    notices,
                });
            }
            let current = next.current_match().ok_or(BracketError::InvalidState)?;
            record(roster, &mut next, current.slot(ticket.side), &mut notices);
        }
        Event::Rollover => {
            if next.state != BracketState::RoundComplete {
                return Err(BracketError::InvalidState);
            }
            let finished = std::mem::take(&mut next.output);
            if finished.len() <= 1 {
                let champion = finished.first().copied().flatten();
                next.state = BracketState::TournamentComplete;
                notices.push(Notice::TournamentComplete { champion });
            } else {
                next.round += 1;
                next.match_index = 0;
                next.slots = finished;
                settle(roster, &mut next, &mut notices);
            }
        }
    }

    Ok(Transition {
        progress: next,
        notices,
    })
}

/// Record `winner` for the current match and move to the next one.
fn record<P>(roster: &Roster<P>, progress: &mut Progress, winner: Slot, notices: &mut Vec<Notice>) {
    notices.push(Notice::MatchDecided {
        round: progress.round,
        match_index: progress.match_index,
        winner,
    });
    progress.output.push(winner);
    progress.match_index += 1;
    progress.epoch += 1;
    settle(roster, progress, notices);
}

/// Classify the match under the pointer. Double byes are decided on the spot with an
/// empty winner so the next round keeps exactly half the slots.
fn settle<P>(roster: &Roster<P>, progress: &mut Progress, notices: &mut Vec<Notice>) {
    progress.pending = None;
    loop {
        let i = progress.match_index * 2;
        if i >= progress.slots.len() {
            progress.state = BracketState::RoundComplete;
            progress.history.push(progress.output.clone());
            notices.push(Notice::RoundComplete {
                round: progress.round,
                output: progress.output.clone(),
            });
            return;
        }
        debug_assert!(i + 1 < progress.slots.len(), "odd slot count in round");

        let present = |slot: Slot| slot.is_some_and(|seed| roster.is_present(seed));
        let (home, away) = (progress.slots[i], progress.slots[i + 1]);
        let side = match (present(home), present(away)) {
            (true, true) => {
                progress.state = BracketState::AwaitingPick;
                return;
            }
            (true, false) => Side::Home,
            (false, true) => Side::Away,
            (false, false) => {
                notices.push(Notice::MatchDecided {
                    round: progress.round,
                    match_index: progress.match_index,
                    winner: None,
                });
                progress.output.push(None);
                progress.match_index += 1;
                continue;
            }
        };
        progress.state = BracketState::AutoResolving;
        progress.pending = Some(ResolveTicket {
            epoch: progress.epoch,
            round: progress.round,
            match_index: progress.match_index,
            side,
        });
        return;
    }
}

/// Something a caller may want to react to after a controller call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketEvent<P> {
    MatchDecided {
        round: usize,
        match_index: usize,
        winner: Option<Participant<P>>,
    },
    /// A bye will resolve after `delay` unless the ticket goes stale first.
    AutoResolveScheduled {
        ticket: ResolveTicket,
        delay: Duration,
    },
    RoundComplete {
        round: usize,
        output: RoundOutput<P>,
    },
    TournamentComplete {
        champion: Option<Participant<P>>,
    },
}

/// The match currently on screen, with payloads looked up.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMatch<P> {
    pub round: usize,
    pub match_index: usize,
    pub home: Option<Participant<P>>,
    pub away: Option<Participant<P>>,
}

/// Runs one bracket: owns the plan, the seed lookup and the progress.
#[derive(Clone, Debug)]
pub struct RoundController<P> {
    plan: BracketPlan,
    roster: Roster<P>,
    progress: Progress,
    auto_resolve_delay: Duration,
}

impl<P: Clone> RoundController<P> {
    pub fn new(plan: BracketPlan, roster: Roster<P>) -> Self {
        Self::with_auto_resolve_delay(plan, roster, DEFAULT_AUTO_RESOLVE_DELAY)
    }

    /// A zero delay resolves byes synchronously inside each call.
    pub fn with_auto_resolve_delay(plan: BracketPlan, roster: Roster<P>, delay: Duration) -> Self {
        let mut controller = Self {
            plan: BracketPlan::default(),
            roster: Roster::default(),
            progress: Progress::default(),
            auto_resolve_delay: delay,
        };
        controller.reset(plan, roster);
        controller
    }

    /// Start over with a new plan and roster. Any scheduled resolution goes stale.
    pub fn reset(&mut self, plan: BracketPlan, roster: Roster<P>) -> Vec<BracketEvent<P>> {
        let epoch = self.progress.epoch + 1;
        let (progress, notices) = Progress::start(&plan, &roster, epoch);
        self.plan = plan;
        self.roster = roster;
        self.progress = progress;
        let mut events = self.translate(notices);
        self.run_until_waiting(&mut events);
        events
    }

    /// Record the participant on `side` as the winner of the current match.
    pub fn pick(&mut self, side: Side) -> Result<Vec<BracketEvent<P>>, BracketError> {
        self.apply(Event::Pick(side))
    }

    /// Fire a scheduled bye resolution. Stale tickets are ignored.
    pub fn resolve(&mut self, ticket: ResolveTicket) -> Vec<BracketEvent<P>> {
        if self.progress.pending != Some(ticket) {
            log::trace!("Ignoring stale ticket {:?}", ticket);
            return Vec::new();
        }
        self.apply(Event::AutoResolve(ticket)).unwrap_or_default()
    }

    fn apply(&mut self, event: Event) -> Result<Vec<BracketEvent<P>>, BracketError> {
        let Transition { progress, notices } = transition(&self.roster, &self.progress, event)?;
        self.progress = progress;
        let mut events = self.translate(notices);
        self.run_until_waiting(&mut events);
        Ok(events)
    }

    /// Roll over finished rounds and resolve byes until a pick or a timer is needed.
    fn run_until_waiting(&mut self, events: &mut Vec<BracketEvent<P>>) {
        loop {
            let event = match (self.progress.state, self.progress.pending) {
                (BracketState::RoundComplete, _) => Event::Rollover,
                (BracketState::AutoResolving, Some(ticket)) if self.auto_resolve_delay.is_zero() => {
                    Event::AutoResolve(ticket)
                }
                (BracketState::AutoResolving, Some(ticket)) => {
                    events.push(BracketEvent::AutoResolveScheduled {
                        ticket,
                        delay: self.auto_resolve_delay,
                    });
                    return;
                }
                _ => return,
            };
            match transition(&self.roster, &self.progress, event) {
                Ok(Transition { progress, notices }) => {
                    self.progress = progress;
                    events.extend(self.translate(notices));
                }
                Err(e) => {
                    log::error!("Bracket evaluation stopped: {}", e);
                    return;
                }
            }
        }
    }

    fn translate(&self, notices: Vec<Notice>) -> Vec<BracketEvent<P>> {
        notices
            .into_iter()
            .map(|notice| match notice {
                Notice::MatchDecided {
                    round,
                    match_index,
                    winner,
                } => {
                    log::debug!("Round {} match {} -> {:?}", round, match_index, winner);
                    BracketEvent::MatchDecided {
                        round,
                        match_index,
                        winner: self.roster.participant(winner),
                    }
                }
                Notice::RoundComplete { round, output } => {
                    log::debug!("Round {} complete ({} advancing)", round, output.len());
                    BracketEvent::RoundComplete {
                        round,
                        output: output.iter().map(|&s| self.roster.participant(s)).collect(),
                    }
                }
                Notice::TournamentComplete { champion } => {
                    log::info!("Bracket decided, champion seed {:?}", champion);
                    BracketEvent::TournamentComplete {
                        champion: self.roster.participant(champion),
                    }
                }
            })
            .collect()
    }

    pub fn state(&self) -> BracketState {
        self.progress.state
    }

    pub fn is_complete(&self) -> bool {
        self.progress.state == BracketState::TournamentComplete
    }

    pub fn round(&self) -> usize {
        self.progress.round
    }

    pub fn round_count(&self) -> usize {
        self.plan.round_count
    }

    pub fn match_index(&self) -> usize {
        self.progress.match_index
    }

    pub fn plan(&self) -> &BracketPlan {
        &self.plan
    }

    pub fn roster(&self) -> &Roster<P> {
        &self.roster
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn auto_resolve_delay(&self) -> Duration {
        self.auto_resolve_delay
    }

    pub fn pending_ticket(&self) -> Option<ResolveTicket> {
        self.progress.pending
    }

    /// Current match with payloads (`None` for byes), or `None` when nothing is pending.
    pub fn current_match(&self) -> Option<CurrentMatch<P>> {
        let m = self.progress.current_match()?;
        Some(CurrentMatch {
            round: self.progress.round,
            match_index: self.progress.match_index,
            home: self.roster.participant(m.home),
            away: self.roster.participant(m.away),
        })
    }

    pub fn champion(&self) -> Option<Participant<P>> {
        self.roster.participant(self.progress.champion())
    }

    /// Initial seeding followed by every completed round, as participants.
    pub fn round_outputs(&self) -> Vec<RoundOutput<P>> {
        self.progress
            .history
            .iter()
            .map(|round| round.iter().map(|&s| self.roster.participant(s)).collect())
            .collect()
    }

    /// Best-known ranking so far.
    pub fn placements(&self) -> Vec<Participant<P>> {
        compute_placements(&self.round_outputs())
    }
}
