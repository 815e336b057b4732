use super::Inner;
use std::{sync::Weak, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Re-checks the held credential every `every` while the session of `generation` is
/// live. The task holds only a weak reference so it never keeps a torn-down manager
/// alive, and it stops after the first failed check.
pub(super) fn spawn(inner: Weak<Inner>, generation: u64, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(inner) = inner.upgrade() else {
                break;
            };

            if !inner.revalidate(generation) {
                break;
            }
        }

        debug!(generation, "revalidation stopped");
    })
}
