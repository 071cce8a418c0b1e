use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::sensor::Reading;
use crate::view::TimeWindow;

/// A history entry that passed the window filter, with its parsed instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedReading<'a> {
    pub reading: &'a Reading,
    pub at: DateTime<Utc>,
}

/// Select the readings that fall inside `window` as seen from `now`.
///
/// A reading is kept when `now - at <= window.duration()`, so the boundary is
/// inclusive and readings stamped slightly in the future (clock skew on the
/// sensor) are kept too. Readings with unreadable timestamps never match.
/// History order is preserved.
#[must_use]
pub fn filter_window<'a>(
    history: &'a [Reading],
    window: TimeWindow,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Vec<TimedReading<'a>> {
    let limit = window.duration();

    history
        .iter()
        .filter_map(|reading| {
            let at = reading.instant(tz)?;
            (now - at <= limit).then_some(TimedReading { reading, at })
        })
        .collect()
}
