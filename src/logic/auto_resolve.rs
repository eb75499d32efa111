//! Delayed bye resolution on the tokio timer.

use crate::logic::controller::{BracketEvent, ResolveTicket, RoundController};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Ticket of the resolution scheduled by a controller call, if any.
pub fn scheduled_ticket<P>(events: &[BracketEvent<P>]) -> Option<(ResolveTicket, Duration)> {
    events.iter().rev().find_map(|e| match e {
        BracketEvent::AutoResolveScheduled { ticket, delay } => Some((*ticket, *delay)),
        _ => None,
    })
}

/// Sleep `delay`, hand the ticket to `apply`, and repeat while `apply` schedules another.
///
/// `apply` should resolve the ticket against the current controller and return the
/// follow-up ticket it scheduled. A stale ticket returns `None` and ends the loop.
pub async fn drive_auto_resolution<F>(ticket: ResolveTicket, delay: Duration, mut apply: F)
where
    F: FnMut(ResolveTicket) -> Option<(ResolveTicket, Duration)>,
{
    let mut next = Some((ticket, delay));
    while let Some((ticket, delay)) = next {
        tokio::time::sleep(delay).await;
        next = apply(ticket);
    }
}

/// Spawn a driver for a controller shared behind a mutex.
pub fn spawn_auto_resolution<P>(
    controller: Arc<Mutex<RoundController<P>>>,
    ticket: ResolveTicket,
    delay: Duration,
) -> JoinHandle<()>
where
    P: Clone + Send + 'static,
{
    tokio::spawn(drive_auto_resolution(ticket, delay, move |ticket| {
        let mut c = match controller.lock() {
            Ok(guard) => guard,
            Err(_) => {
                log::warn!("Controller lock poisoned; dropping auto-resolution");
                return None;
            }
        };
        scheduled_ticket(&c.resolve(ticket))
    }))
}
