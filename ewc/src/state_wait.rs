//! Polling an active connection until it is activated.
//!
//! NetworkManager creates the active connection object as soon as
//! `AddAndActivateConnection` returns, then walks it through
//! `activating` to `activated`. This module reads its `State` property
//! until it reports `activated` or the deadline passes.
//!
//! The deadline is a single wall-clock instant computed up front. It is
//! checked before every read, each read races the remaining budget, and the
//! sleeps between reads (the poll interval after a successful read, the
//! backoff after a failed one) are clipped to it. A daemon that keeps
//! failing or hanging on reads therefore cannot push the loop past the
//! timeout.

use futures::{FutureExt, select};
use futures_timer::Delay;
use log::{debug, warn};
use std::pin::pin;
use std::time::{Duration, Instant};
use zvariant::OwnedObjectPath;

use crate::bus::NetworkBus;
use crate::config::TimeoutConfig;
use crate::constants::timeouts::bounded_wait;
use crate::models::ActiveConnectionState;

/// Outcome of a single bounded state read.
enum Read {
    State(ActiveConnectionState),
    Failed,
    DeadlineReached,
}

/// Waits for an active connection to reach the activated state.
///
/// Returns `true` as soon as a read reports `activated`. Every other state,
/// `activating` and `deactivated` included, means "not yet" and polling
/// continues. Returns `false` once `timeouts.connection_timeout` has elapsed.
/// A zero timeout returns `false` without reading. Timeouts longer than a
/// day are clamped to one day.
pub(crate) async fn await_activated<B: NetworkBus + ?Sized>(
    bus: &B,
    active: &OwnedObjectPath,
    timeouts: &TimeoutConfig,
) -> bool {
    let deadline = Instant::now() + bounded_wait(timeouts.connection_timeout);
    let mut polls = 0u32;

    loop {
        let Some(remaining) = time_left(deadline) else {
            break;
        };

        polls += 1;
        let pause = match read_state(bus, active, remaining).await {
            Read::State(ActiveConnectionState::Activated) => {
                debug!("Connection activated after {polls} poll(s)");
                return true;
            }
            Read::State(state) => {
                debug!("Poll {polls}: active connection is {state}");
                timeouts.poll_interval
            }
            Read::Failed => timeouts.read_error_backoff,
            Read::DeadlineReached => break,
        };

        let Some(remaining) = time_left(deadline) else {
            break;
        };
        Delay::new(pause.min(remaining)).await;
    }

    warn!(
        "Connection not activated within {:?} ({polls} poll(s))",
        timeouts.connection_timeout
    );
    false
}

/// Time left until `deadline`, or `None` if it has passed.
fn time_left(deadline: Instant) -> Option<Duration> {
    let left = deadline.saturating_duration_since(Instant::now());
    (!left.is_zero()).then_some(left)
}

async fn read_state<B: NetworkBus + ?Sized>(
    bus: &B,
    active: &OwnedObjectPath,
    budget: Duration,
) -> Read {
    let mut read = pin!(bus.active_connection_state(active).fuse());
    let mut timeout_delay = pin!(Delay::new(budget).fuse());

    select! {
        result = read => match result {
            Ok(code) => Read::State(ActiveConnectionState::from(code)),
            Err(e) => {
                warn!("Failed to read state of {}: {e}", active.as_str());
                Read::Failed
            }
        },
        _ = timeout_delay => Read::DeadlineReached,
    }
}
