//! Background timers feeding the dashboard: the readings poll and the
//! refresh countdown.

pub mod scheduler;
pub mod worker;

pub use scheduler::{start, PollerTasks};
