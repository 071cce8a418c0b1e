use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::dashboard::{DashboardEvent, DashboardHandle};
use crate::error::AppResult;
use crate::sensor::ReadingSource;
use crate::sync::worker;

/// Countdown display resolution.
const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Running poll and countdown timers. Dropping this stops both timers but
/// leaves the dashboard active; [`PollerTasks::shutdown`] does both.
pub struct PollerTasks {
    dashboard: DashboardHandle,
    shutdown_tx: watch::Sender<bool>,
    poll: JoinHandle<()>,
    countdown: JoinHandle<()>,
}

/// Activate the dashboard and start both timers.
///
/// The first poll cycle runs immediately; later cycles follow every
/// `poll_interval`.
///
/// # Errors
///
/// Returns `AppError::ServiceUnavailable` if the dashboard task has stopped.
pub async fn start<S: ReadingSource>(
    dashboard: DashboardHandle,
    source: Arc<S>,
    poll_interval: Duration,
) -> AppResult<PollerTasks> {
    dashboard.apply(DashboardEvent::Activated).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let poll = tokio::spawn(run_readings_poll(
        dashboard.clone(),
        source,
        poll_interval,
        shutdown_rx.clone(),
    ));
    let countdown = tokio::spawn(run_countdown(dashboard.clone(), shutdown_rx));

    Ok(PollerTasks {
        dashboard,
        shutdown_tx,
        poll,
        countdown,
    })
}

impl PollerTasks {
    /// Stop both timers and deactivate the dashboard.
    ///
    /// Requests already in flight are left to finish; their results are
    /// ignored by the inactive dashboard.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);

        for (name, task) in [("poll", self.poll), ("countdown", self.countdown)] {
            if let Err(e) = task.await {
                tracing::error!(task = name, error = %e, "Scheduler task failed");
            }
        }

        if let Err(e) = self.dashboard.apply(DashboardEvent::Deactivated).await {
            tracing::debug!(error = %e, "Dashboard already stopped");
        }

        tracing::info!("Poller stopped");
    }
}

/// Run the readings poll on a schedule.
///
/// Cycles are never deduplicated: each tick starts a new request even if the
/// previous one has not answered yet. Ordering is settled by sequence number
/// in the dashboard.
pub async fn run_readings_poll<S: ReadingSource>(
    dashboard: DashboardHandle,
    source: Arc<S>,
    poll_interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::info!(
        interval_secs = poll_interval.as_secs(),
        "Starting readings poll scheduler"
    );

    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // First tick completes immediately
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        let seq = match dashboard.begin_poll().await {
            Ok(seq) => seq,
            Err(e) => {
                tracing::warn!(error = %e, "Dashboard stopped, ending poll scheduler");
                break;
            }
        };

        tracing::debug!(seq, "Starting poll cycle");
        tokio::spawn(worker::poll_cycle(dashboard.clone(), Arc::clone(&source), seq));
    }

    tracing::info!("Readings poll scheduler stopped");
}

/// Tick the refresh countdown once per second.
pub async fn run_countdown(dashboard: DashboardHandle, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = interval(COUNTDOWN_TICK);

    // Skip the immediate first tick so the display starts at its maximum
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        if let Err(e) = dashboard.tick().await {
            tracing::warn!(error = %e, "Dashboard stopped, ending countdown");
            break;
        }
    }

    tracing::debug!("Countdown scheduler stopped");
}
