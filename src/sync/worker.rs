use std::sync::Arc;

use crate::dashboard::DashboardHandle;
use crate::sensor::ReadingSource;

/// Run one poll cycle: fetch the reading list and report it as `seq`.
///
/// Failures are logged here and handed to the dashboard as a stale marker;
/// the previous history stays in place. If the dashboard is gone by the time
/// the response arrives, the result is dropped.
pub async fn poll_cycle<S: ReadingSource>(dashboard: DashboardHandle, source: Arc<S>, seq: u64) {
    let result = source.fetch_readings().await;

    match &result {
        Ok(readings) => {
            tracing::debug!(seq, count = readings.len(), "Poll cycle fetched readings");
        }
        Err(e) => {
            tracing::warn!(seq, error = %e, "Poll cycle failed, keeping previous readings");
        }
    }

    if let Err(e) = dashboard.finish_poll(seq, result).await {
        tracing::debug!(seq, error = %e, "Dashboard stopped, discarding poll result");
    }
}
