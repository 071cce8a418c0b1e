use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::dashboard::countdown::Countdown;
use crate::sensor::Reading;
use crate::view::TimeWindow;

/// Freshness of the data behind the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedStatus {
    /// No poll has settled yet
    Loading,
    /// The latest settled poll succeeded
    Live { updated_at: DateTime<Utc> },
    /// The latest settled poll failed; the data shown is from an older poll
    Stale {
        error: String,
        failed_at: DateTime<Utc>,
        last_success_at: Option<DateTime<Utc>>,
    },
}

/// Result of one poll cycle as seen by the store. Errors are already logged
/// by the worker, only the message travels.
pub type PollOutcome = Result<Vec<Reading>, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    Activated,
    Deactivated,
    PollStarted { seq: u64 },
    PollFinished { seq: u64, outcome: PollOutcome },
    Tick,
    SelectWindow(TimeWindow),
}

impl DashboardEvent {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Activated => "activated",
            Self::Deactivated => "deactivated",
            Self::PollStarted { .. } => "poll_started",
            Self::PollFinished { .. } => "poll_finished",
            Self::Tick => "tick",
            Self::SelectWindow(_) => "select_window",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Timers and responses after teardown
    Inactive,
    /// A response older than one already applied
    StaleResponse { seq: u64, settled_seq: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Changed,
    Ignored(IgnoreReason),
}

/// Immutable view of the store published after every applied event.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub history: Arc<Vec<Reading>>,
    pub current: Option<Reading>,
    pub window: TimeWindow,
    pub countdown: u32,
    pub status: FeedStatus,
    pub active: bool,
    /// Highest poll sequence whose result has been applied
    pub settled_seq: u64,
}

#[derive(Debug, Clone)]
pub struct DashboardStore {
    history: Arc<Vec<Reading>>,
    current: Option<Reading>,
    window: TimeWindow,
    countdown: Countdown,
    status: FeedStatus,
    active: bool,
    settled_seq: u64,
    last_success_at: Option<DateTime<Utc>>,
}

impl DashboardStore {
    /// Fresh, inactive store. Nothing but window selection is applied until
    /// an `Activated` event arrives.
    #[must_use]
    pub fn new(window: TimeWindow, countdown_max: u32) -> Self {
        Self {
            history: Arc::new(Vec::new()),
            current: None,
            window,
            countdown: Countdown::new(countdown_max),
            status: FeedStatus::Loading,
            active: false,
            settled_seq: 0,
            last_success_at: None,
        }
    }

    pub fn apply(&mut self, event: DashboardEvent, at: DateTime<Utc>) -> Applied {
        match event {
            DashboardEvent::Activated => {
                self.active = true;
            }
            DashboardEvent::Deactivated => {
                self.active = false;
            }
            DashboardEvent::SelectWindow(window) => {
                self.window = window;
            }
            _ if !self.active => return Applied::Ignored(IgnoreReason::Inactive),
            DashboardEvent::Tick => self.countdown.tick(),
            DashboardEvent::PollStarted { .. } => self.countdown.reset(),
            DashboardEvent::PollFinished { seq, outcome } => {
                if seq <= self.settled_seq {
                    return Applied::Ignored(IgnoreReason::StaleResponse {
                        seq,
                        settled_seq: self.settled_seq,
                    });
                }
                self.settled_seq = seq;
                self.settle(outcome, at);
            }
        }
        Applied::Changed
    }

    fn settle(&mut self, outcome: PollOutcome, at: DateTime<Utc>) {
        match outcome {
            Ok(readings) => {
                // An empty list clears the chart but keeps the last known reading
                if let Some(last) = readings.last() {
                    self.current = Some(last.clone());
                }
                self.history = Arc::new(readings);
                self.last_success_at = Some(at);
                self.status = FeedStatus::Live { updated_at: at };
            }
            Err(error) => {
                self.status = FeedStatus::Stale {
                    error,
                    failed_at: at,
                    last_success_at: self.last_success_at,
                };
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            history: Arc::clone(&self.history),
            current: self.current.clone(),
            window: self.window,
            countdown: self.countdown.value(),
            status: self.status.clone(),
            active: self.active,
            settled_seq: self.settled_seq,
        }
    }
}
