//! Integration tests for the round controller: picks, byes, rollover, reset.

use playlist_bracket_web::{
    generate_bracket, transition, BracketError, BracketEvent, BracketState, Event, Roster,
    RoundController, Side,
};
use std::collections::HashSet;
use std::time::Duration;

fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("T{i}")).collect()
}

/// Controller that resolves byes synchronously.
fn instant(n: usize) -> RoundController<String> {
    RoundController::with_auto_resolve_delay(generate_bracket(n), Roster::new(names(n)), Duration::ZERO)
}

fn delayed(n: usize) -> RoundController<String> {
    RoundController::with_auto_resolve_delay(
        generate_bracket(n),
        Roster::new(names(n)),
        Duration::from_millis(200),
    )
}

fn seeds(events: &[BracketEvent<String>]) -> Vec<Option<usize>> {
    events
        .iter()
        .filter_map(|e| match e {
            BracketEvent::MatchDecided { winner, .. } => Some(winner.as_ref().map(|p| p.seed)),
            _ => None,
        })
        .collect()
}

#[test]
fn four_participants_play_to_a_champion() {
    let mut c = instant(4);
    assert_eq!(c.state(), BracketState::AwaitingPick);
    let m = c.current_match().unwrap();
    assert_eq!(m.home.unwrap().seed, 1);
    assert_eq!(m.away.unwrap().seed, 4);

    c.pick(Side::Home).unwrap();
    let events = c.pick(Side::Away).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        BracketEvent::RoundComplete { round: 0, output } if output.len() == 2
    )));
    assert_eq!(c.round(), 1);
    assert_eq!(c.match_index(), 0);

    let m = c.current_match().unwrap();
    assert_eq!((m.home.unwrap().seed, m.away.unwrap().seed), (1, 2));

    let events = c.pick(Side::Away).unwrap();
    let champion = events.iter().find_map(|e| match e {
        BracketEvent::TournamentComplete { champion } => champion.clone(),
        _ => None,
    });
    assert_eq!(champion.map(|p| p.payload), Some("T2".to_string()));
    assert_eq!(c.state(), BracketState::TournamentComplete);
    assert_eq!(c.champion().unwrap().seed, 2);
    assert!(c.current_match().is_none());

    let order: Vec<_> = c.placements().iter().map(|p| p.seed).collect();
    assert_eq!(order, vec![2, 1, 4, 3]);
}

#[test]
fn pick_after_completion_is_invalid_state() {
    let mut c = instant(2);
    c.pick(Side::Home).unwrap();
    assert!(c.is_complete());
    assert_eq!(c.pick(Side::Home), Err(BracketError::InvalidState));
}

#[test]
fn slot_index_must_be_zero_or_one() {
    assert_eq!(Side::try_from(0), Ok(Side::Home));
    assert_eq!(Side::try_from(1), Ok(Side::Away));
    assert_eq!(Side::try_from(2), Err(BracketError::InvalidSlot(2)));
}

#[test]
fn bye_resolves_without_a_pick_when_there_is_no_delay() {
    // 3 participants: [1, bye], [3, 2]
    let c = instant(3);
    assert_eq!(c.state(), BracketState::AwaitingPick);
    assert_eq!(c.match_index(), 1);
    assert_eq!(c.progress().output, vec![Some(1)]);
    let m = c.current_match().unwrap();
    assert_eq!((m.home.unwrap().seed, m.away.unwrap().seed), (3, 2));
}

#[test]
fn delayed_bye_waits_for_its_ticket() {
    let mut c = delayed(3);
    assert_eq!(c.state(), BracketState::AutoResolving);
    let ticket = c.pending_ticket().unwrap();
    assert_eq!((ticket.round, ticket.match_index, ticket.side), (0, 0, Side::Home));
    let m = c.current_match().unwrap();
    assert!(m.away.is_none());

    let events = c.resolve(ticket);
    assert_eq!(seeds(&events), vec![Some(1)]);
    assert_eq!(c.state(), BracketState::AwaitingPick);
    assert_eq!(c.match_index(), 1);

    // Same ticket again is stale.
    assert!(c.resolve(ticket).is_empty());
    assert_eq!(c.match_index(), 1);
}

#[test]
fn delayed_bye_in_the_away_slot_schedules_away_side() {
    // 5 participants: [1, bye], [5, 4], [3, bye], [bye, 2]
    let mut c = instant(5);
    assert_eq!(c.match_index(), 1);
    c.pick(Side::Home).unwrap();
    // Byes at matches 2 and 3 resolve on the spot, then the round rolls over.
    assert_eq!(c.round(), 1);
    assert_eq!(c.progress().history[1], vec![Some(1), Some(5), Some(3), Some(2)]);

    let mut c = RoundController::with_auto_resolve_delay(
        generate_bracket(5),
        Roster::new(names(5)),
        Duration::from_millis(50),
    );
    let first = c.pending_ticket().unwrap();
    c.resolve(first);
    let events = c.pick(Side::Away).unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, BracketEvent::AutoResolveScheduled { ticket, .. } if ticket.match_index == 2)));
    let t = c.pending_ticket().unwrap();
    c.resolve(t);
    let t = c.pending_ticket().unwrap();
    assert_eq!((t.match_index, t.side), (3, Side::Away));
}

#[test]
fn picking_during_auto_resolution_takes_the_real_side_only() {
    let mut c = delayed(3);
    let ticket = c.pending_ticket().unwrap();
    assert_eq!(c.pick(Side::Away), Err(BracketError::InvalidState));
    assert_eq!(c.state(), BracketState::AutoResolving);

    c.pick(Side::Home).unwrap();
    assert_eq!(c.match_index(), 1);
    // The scheduled resolution no longer applies.
    assert!(c.resolve(ticket).is_empty());
    assert_eq!(c.progress().output, vec![Some(1)]);
}

#[test]
fn reset_cancels_pending_resolution() {
    let mut c = delayed(3);
    let stale = c.pending_ticket().unwrap();
    c.reset(generate_bracket(3), Roster::new(names(3)));
    let fresh = c.pending_ticket().unwrap();
    assert_ne!(stale, fresh);

    assert!(c.resolve(stale).is_empty());
    assert_eq!(c.state(), BracketState::AutoResolving);
    assert_eq!(c.match_index(), 0);
    assert!(c.progress().output.is_empty());
}

#[test]
fn reset_with_new_participants_starts_over() {
    let mut c = instant(4);
    c.pick(Side::Home).unwrap();
    c.reset(generate_bracket(2), Roster::new(vec!["x".to_string(), "y".to_string()]));
    assert_eq!(c.round(), 0);
    assert_eq!(c.match_index(), 0);
    assert_eq!(c.round_count(), 1);
    assert_eq!(c.round_outputs().len(), 1);
}

#[test]
fn single_participant_is_champion_without_play() {
    let c = instant(1);
    assert!(c.is_complete());
    assert_eq!(c.round_count(), 0);
    assert_eq!(c.champion().unwrap().payload, "T1");
    assert_eq!(c.placements().len(), 1);

    let empty = instant(0);
    assert!(empty.is_complete());
    assert!(empty.champion().is_none());
    assert!(empty.placements().is_empty());
}

#[test]
fn missing_payloads_count_as_byes_and_double_byes_carry_forward() {
    // [1, 4], [3, 2] with only seed 1 present: match 1 has no one at all.
    let roster = Roster::from_entries(vec![Some("a".to_string()), None, None, None]);
    let c = RoundController::with_auto_resolve_delay(generate_bracket(4), roster, Duration::ZERO);
    assert!(c.is_complete());
    assert_eq!(c.champion().unwrap().seed, 1);
    assert_eq!(c.progress().history[1], vec![Some(1), None]);

    let placements = c.placements();
    assert_eq!(placements.len(), 1);
    assert_eq!(placements[0].payload, "a");
}

#[test]
fn each_round_halves_the_matches() {
    let mut c = instant(8);
    let mut per_round = vec![0usize; 3];
    while !c.is_complete() {
        for e in c.pick(Side::Home).unwrap() {
            if let BracketEvent::MatchDecided { round, .. } = e {
                per_round[round] += 1;
            }
        }
    }
    assert_eq!(per_round, vec![4, 2, 1]);
}

#[test]
fn full_brackets_place_every_participant_once() {
    for n in [2, 4, 8, 16, 32] {
        let mut c = instant(n);
        let mut side = Side::Home;
        while !c.is_complete() {
            c.pick(side).unwrap();
            side = side.other();
        }
        let placements = c.placements();
        assert_eq!(placements.len(), n);
        let unique: HashSet<_> = placements.iter().map(|p| p.seed).collect();
        assert_eq!(unique.len(), n);
        assert_eq!(placements[0].seed, c.champion().unwrap().seed);
    }
}

#[test]
fn transition_leaves_its_input_untouched() {
    let c = instant(4);
    let roster = Roster::new(names(4));
    let before = c.progress().clone();

    let next = transition(&roster, &before, Event::Pick(Side::Home)).unwrap();
    assert_eq!(&before, c.progress());
    assert_eq!(next.progress.match_index, 1);
    assert_eq!(next.progress.output, vec![Some(1)]);

    assert_eq!(
        transition(&roster, &before, Event::Rollover),
        Err(BracketError::InvalidState)
    );
}

#[test]
fn placements_are_available_mid_tournament() {
    let mut c = instant(4);
    c.pick(Side::Home).unwrap();
    // Only the initial seeding is history so far.
    let order: Vec<_> = c.placements().iter().map(|p| p.seed).collect();
    assert_eq!(order, vec![1, 4, 3, 2]);
}
