use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One temperature sample as returned by `GET /temperatura`.
///
/// The timestamp is kept verbatim. The backend is only promised to send
/// something ISO-8601 shaped, and a single bad entry must not make the whole
/// response unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reading {
    /// ISO-8601 timestamp as sent by the sensor backend
    pub timestamp: String,
    /// Temperature in degrees Celsius
    pub temp: f64,
}

impl Reading {
    #[must_use]
    pub fn new(timestamp: impl Into<String>, temp: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            temp,
        }
    }

    /// Parsed instant of this reading, `None` if the timestamp is unreadable.
    #[must_use]
    pub fn instant(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp, tz)
    }
}

/// Offset layouts RFC 3339 parsing rejects: space separator with a numeric
/// offset, and basic offsets without a colon (`+0000`).
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Date-time layouts without an offset, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (`Z` or numeric offset, `T` or space separator), naive
/// date-times which are read as wall-clock time in `tz`, and bare dates which
/// are read as UTC midnight.
#[must_use]
pub fn parse_timestamp(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            // Ambiguous local times (DST fall-back) resolve to the earlier one
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
