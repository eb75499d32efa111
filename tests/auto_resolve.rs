//! Integration tests for delayed bye resolution on the tokio timer.

use playlist_bracket_web::{
    drive_auto_resolution, generate_bracket, spawn_auto_resolution, BracketState, Roster,
    RoundController,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn shared(entries: Vec<Option<&'static str>>, delay_ms: u64) -> Arc<Mutex<RoundController<&'static str>>> {
    let plan = generate_bracket(entries.len());
    Arc::new(Mutex::new(RoundController::with_auto_resolve_delay(
        plan,
        Roster::from_entries(entries),
        Duration::from_millis(delay_ms),
    )))
}

#[tokio::test]
async fn scheduled_bye_resolves_after_the_delay() {
    let c = shared(vec![Some("a"), Some("b"), Some("c")], 10);
    let (ticket, delay) = {
        let g = c.lock().unwrap();
        assert_eq!(g.state(), BracketState::AutoResolving);
        (g.pending_ticket().unwrap(), g.auto_resolve_delay())
    };

    spawn_auto_resolution(c.clone(), ticket, delay).await.unwrap();

    let g = c.lock().unwrap();
    assert_eq!(g.state(), BracketState::AwaitingPick);
    assert_eq!(g.match_index(), 1);
    assert_eq!(g.progress().output, vec![Some(1)]);
}

#[tokio::test]
async fn driver_follows_consecutive_byes() {
    // [1, 4] and [3, 2] with seeds 3 and 4 missing: two byes in a row.
    let c = shared(vec![Some("a"), Some("b"), None, None], 5);
    let (ticket, delay) = {
        let g = c.lock().unwrap();
        (g.pending_ticket().unwrap(), g.auto_resolve_delay())
    };

    spawn_auto_resolution(c.clone(), ticket, delay).await.unwrap();

    let g = c.lock().unwrap();
    assert_eq!(g.round(), 1);
    assert_eq!(g.state(), BracketState::AwaitingPick);
    let m = g.current_match().unwrap();
    assert_eq!((m.home.unwrap().seed, m.away.unwrap().seed), (1, 2));
}

#[tokio::test]
async fn reset_before_the_delay_leaves_new_round_alone() {
    let c = shared(vec![Some("a"), Some("b"), Some("c")], 30);
    let (ticket, delay) = {
        let g = c.lock().unwrap();
        (g.pending_ticket().unwrap(), g.auto_resolve_delay())
    };
    let handle = spawn_auto_resolution(c.clone(), ticket, delay);

    {
        let mut g = c.lock().unwrap();
        g.reset(generate_bracket(3), Roster::new(vec!["x", "y", "z"]));
    }
    handle.await.unwrap();

    let g = c.lock().unwrap();
    assert_eq!(g.state(), BracketState::AutoResolving);
    assert_eq!(g.match_index(), 0);
    assert!(g.progress().output.is_empty());
    assert_ne!(g.pending_ticket(), Some(ticket));
}

#[tokio::test]
async fn driver_stops_when_apply_returns_nothing() {
    let c = shared(vec![Some("a"), Some("b"), Some("c")], 1);
    let ticket = c.lock().unwrap().pending_ticket().unwrap();
    let mut calls = 0;
    drive_auto_resolution(ticket, Duration::from_millis(1), |_| {
        calls += 1;
        None
    })
    .await;
    assert_eq!(calls, 1);
}
