//! Dashboard application state: reading history, current reading, selected
//! window, refresh countdown and feed status, owned by a single task.

pub mod countdown;
pub mod hub;
pub mod store;

pub use countdown::Countdown;
pub use hub::{spawn, DashboardHandle};
pub use store::{
    Applied, DashboardEvent, DashboardSnapshot, DashboardStore, FeedStatus, IgnoreReason,
    PollOutcome,
};
