//! Periodic reclamation of orphaned staged artifacts.

use std::{sync::Arc, time::Duration};

use tracing::{debug, info};

use crate::staging::StagingStore;

/// Sweep the staging directory every `interval`, reclaiming artifacts older
/// than `max_age`. Runs for the life of the process; started only once the
/// session is connected.
pub async fn run_janitor(store: Arc<StagingStore>, interval: Duration, max_age: Duration) {
    info!(
        dir = %store.dir().display(),
        interval_secs = interval.as_secs(),
        max_age_secs = max_age.as_secs(),
        "starting staging janitor"
    );
    let mut tick = tokio::time::interval(interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick fires immediately; skip it so sweeps start one full
    // interval after connect.
    tick.tick().await;
    loop {
        tick.tick().await;
        let removed = store.sweep(max_age).await;
        if removed > 0 {
            info!(removed, "janitor reclaimed orphaned artifacts");
        } else {
            debug!("janitor sweep found nothing to reclaim");
        }
    }
}
