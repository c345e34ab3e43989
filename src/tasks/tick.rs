//! Reminder Tick Task
//!
//! Background task that drives the scheduler's periodic tick.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::scheduler::SchedulerCore;

/// Spawns the loop that ticks the scheduler until `shutdown` flips to true
/// or its sender is dropped.
///
/// A tick in progress always runs to completion; the shutdown signal is only
/// observed between ticks.
///
/// # Returns
/// A JoinHandle that resolves once the loop has exited.
pub(crate) fn spawn_tick_task(
    core: Arc<SchedulerCore>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let period = core.tick_interval();

    tokio::spawn(async move {
        info!("Reminder loop started with interval of {:?}", period);

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let delivered = core.tick().await;
                    if delivered > 0 {
                        info!("Delivered {} reminders", delivered);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    debug!("Ignoring spurious shutdown notification");
                }
            }
        }

        info!("Reminder loop stopped");
    })
}
