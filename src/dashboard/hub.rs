use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::dashboard::store::{Applied, DashboardEvent, DashboardSnapshot, DashboardStore};
use crate::error::{AppError, AppResult};
use crate::sensor::Reading;
use crate::view::{DashboardView, TimeWindow};

/// Events queued ahead of the state task before senders start waiting.
const QUEUE_CAPACITY: usize = 64;

struct Command {
    event: DashboardEvent,
    ack: Option<oneshot::Sender<DashboardSnapshot>>,
}

/// Start the task that owns `store`.
///
/// Every mutation goes through one FIFO queue, so events from the poll timer,
/// the countdown timer, in-flight responses and user selection are applied
/// one at a time in arrival order. The task ends once every handle is dropped.
pub fn spawn(store: DashboardStore) -> (DashboardHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    let (snapshot_tx, snapshot_rx) = watch::channel(store.snapshot());

    let task = tokio::spawn(run(store, rx, snapshot_tx));

    let handle = DashboardHandle {
        tx,
        snapshots: snapshot_rx,
        next_seq: Arc::new(AtomicU64::new(0)),
    };

    (handle, task)
}

async fn run(
    mut store: DashboardStore,
    mut rx: mpsc::Receiver<Command>,
    snapshot_tx: watch::Sender<DashboardSnapshot>,
) {
    tracing::debug!("Dashboard state task started");

    while let Some(Command { event, ack }) = rx.recv().await {
        let kind = event.kind();

        match store.apply(event, Utc::now()) {
            Applied::Changed => {
                snapshot_tx.send_replace(store.snapshot());
            }
            Applied::Ignored(reason) => {
                tracing::debug!(event = kind, ?reason, "Dashboard event ignored");
            }
        }

        if let Some(ack) = ack {
            // Caller may have given up waiting
            let _ = ack.send(snapshot_tx.borrow().clone());
        }
    }

    tracing::debug!("Dashboard state task stopped");
}

/// Cloneable access to the dashboard state: write through the queue, read
/// the latest published snapshot.
#[derive(Clone)]
pub struct DashboardHandle {
    tx: mpsc::Sender<Command>,
    snapshots: watch::Receiver<DashboardSnapshot>,
    next_seq: Arc<AtomicU64>,
}

impl DashboardHandle {
    /// Queue an event without waiting for it to be applied.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ServiceUnavailable` if the state task has stopped.
    pub async fn dispatch(&self, event: DashboardEvent) -> AppResult<()> {
        self.tx
            .send(Command { event, ack: None })
            .await
            .map_err(|_| closed())
    }

    /// Queue an event and wait for the snapshot taken right after it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ServiceUnavailable` if the state task has stopped.
    pub async fn apply(&self, event: DashboardEvent) -> AppResult<DashboardSnapshot> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(Command {
                event,
                ack: Some(ack_tx),
            })
            .await
            .map_err(|_| closed())?;

        ack_rx.await.map_err(|_| closed())
    }

    /// Allocate the next poll sequence number and announce the cycle.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ServiceUnavailable` if the state task has stopped.
    pub async fn begin_poll(&self) -> AppResult<u64> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.dispatch(DashboardEvent::PollStarted { seq }).await?;
        Ok(seq)
    }

    /// Report the result of poll cycle `seq`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ServiceUnavailable` if the state task has stopped.
    pub async fn finish_poll(&self, seq: u64, result: AppResult<Vec<Reading>>) -> AppResult<()> {
        let outcome = result.map_err(|e| e.to_string());
        self.dispatch(DashboardEvent::PollFinished { seq, outcome })
            .await
    }

    /// # Errors
    ///
    /// Returns `AppError::ServiceUnavailable` if the state task has stopped.
    pub async fn tick(&self) -> AppResult<()> {
        self.dispatch(DashboardEvent::Tick).await
    }

    /// # Errors
    ///
    /// Returns `AppError::ServiceUnavailable` if the state task has stopped.
    pub async fn select_window(&self, window: TimeWindow) -> AppResult<DashboardSnapshot> {
        self.apply(DashboardEvent::SelectWindow(window)).await
    }

    /// False once the state task has stopped accepting events.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }

    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified after every applied event.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshots.clone()
    }

    #[must_use]
    pub fn view(&self, now: DateTime<Utc>, tz: &Tz) -> DashboardView {
        DashboardView::build(&self.snapshot(), now, tz)
    }
}

fn closed() -> AppError {
    AppError::ServiceUnavailable("Dashboard state task is not running".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::FeedStatus;

    #[tokio::test]
    async fn events_are_applied_in_arrival_order() {
        let (dashboard, _task) = spawn(DashboardStore::new(TimeWindow::LastHour, 30));
        dashboard.apply(DashboardEvent::Activated).await.unwrap();

        dashboard.tick().await.unwrap();
        dashboard.tick().await.unwrap();
        let snapshot = dashboard
            .select_window(TimeWindow::LastThreeHours)
            .await
            .unwrap();

        assert_eq!(snapshot.countdown, 28);
        assert_eq!(snapshot.window, TimeWindow::LastThreeHours);
        assert_eq!(dashboard.snapshot(), snapshot);
    }

    #[tokio::test]
    async fn sequence_numbers_increase() {
        let (dashboard, _task) = spawn(DashboardStore::new(TimeWindow::LastHour, 30));
        dashboard.apply(DashboardEvent::Activated).await.unwrap();

        assert_eq!(dashboard.begin_poll().await.unwrap(), 1);
        assert_eq!(dashboard.begin_poll().await.unwrap(), 2);
        assert_eq!(dashboard.clone().begin_poll().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let (dashboard, _task) = spawn(DashboardStore::new(TimeWindow::LastHour, 30));
        let mut updates = dashboard.subscribe();
        dashboard.apply(DashboardEvent::Activated).await.unwrap();

        let seq = dashboard.begin_poll().await.unwrap();
        dashboard
            .finish_poll(seq, Ok(vec![Reading::new("2025-06-01T12:00:00Z", 20.0)]))
            .await
            .unwrap();

        updates
            .wait_for(|s| matches!(s.status, FeedStatus::Live { .. }))
            .await
            .unwrap();
        assert_eq!(updates.borrow().history.len(), 1);
    }

    #[tokio::test]
    async fn stopped_task_reports_unavailable() {
        let (dashboard, task) = spawn(DashboardStore::new(TimeWindow::LastHour, 30));
        task.abort();
        let _ = task.await;

        assert!(!dashboard.is_running());
        let err = dashboard.tick().await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }
}
