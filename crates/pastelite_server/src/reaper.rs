//! Periodic removal of pastes that can no longer be read.
//!
//! Reads never delete: a paste whose clock or view budget ran out stays on
//! disk until a sweep collects it. The reaper runs that sweep on a fixed
//! interval, the first one immediately at startup.

use crate::PasteStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Handle to a running reaper task.
pub struct ReaperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Stop the loop and wait for an in-flight sweep to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(err) = self.task.await {
            warn!("Reaper task ended abnormally: {}", err);
        }
    }
}

/// Spawn the reaper on the current tokio runtime.
///
/// # Arguments
/// - `store`: Store to sweep.
/// - `every`: Delay between sweeps. Missed ticks are skipped rather than
///   replayed in a burst.
///
/// # Returns
/// A [`ReaperHandle`] used to stop the task.
pub fn spawn_reaper(store: Arc<PasteStore>, every: Duration) -> ReaperHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_secs = every.as_secs(), "Reaper started");

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Reaper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    run_sweep(&store).await;
                }
            }
        }
    });

    ReaperHandle {
        shutdown: Some(shutdown_tx),
        task,
    }
}

/// Run one sweep off the async workers.
///
/// # Returns
/// Number of pastes removed, or `None` when the sweep failed.
pub async fn run_sweep(store: &Arc<PasteStore>) -> Option<usize> {
    let store = Arc::clone(store);
    let result = tokio::task::spawn_blocking(move || store.delete_expired(Utc::now())).await;

    match result {
        Ok(Ok(0)) => {
            debug!("Sweep found nothing to remove");
            Some(0)
        }
        Ok(Ok(removed)) => {
            info!(removed, "Sweep removed expired pastes");
            Some(removed)
        }
        Ok(Err(err)) => {
            warn!(error = %err, "Sweep failed");
            None
        }
        Err(err) => {
            warn!(error = %err, "Sweep task panicked");
            None
        }
    }
}
