use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Named history window selectable on the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
)]
pub enum TimeWindow {
    #[default]
    #[serde(rename = "1h")]
    LastHour,
    #[serde(rename = "3h")]
    LastThreeHours,
    #[serde(rename = "12h")]
    LastTwelveHours,
    #[serde(rename = "1d")]
    Today,
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "1m")]
    LastMonth,
}

impl TimeWindow {
    /// Every window, in the order the selector shows them.
    pub const ALL: [Self; 6] = [
        Self::LastHour,
        Self::LastThreeHours,
        Self::LastTwelveHours,
        Self::Today,
        Self::LastWeek,
        Self::LastMonth,
    ];

    /// Short key used in the API and configuration
    pub const fn key(self) -> &'static str {
        match self {
            Self::LastHour => "1h",
            Self::LastThreeHours => "3h",
            Self::LastTwelveHours => "12h",
            Self::Today => "1d",
            Self::LastWeek => "7d",
            Self::LastMonth => "1m",
        }
    }

    /// Button label shown on the dashboard
    pub const fn label(self) -> &'static str {
        match self {
            Self::LastHour => "Última hora",
            Self::LastThreeHours => "Últimas 3 horas",
            Self::LastTwelveHours => "Últimas 12 horas",
            Self::Today => "Hoje",
            Self::LastWeek => "Última semana",
            Self::LastMonth => "Último mês",
        }
    }

    pub const fn hours(self) -> i64 {
        match self {
            Self::LastHour => 1,
            Self::LastThreeHours => 3,
            Self::LastTwelveHours => 12,
            // "Hoje" is a rolling 24h window, not calendar day
            Self::Today => 24,
            Self::LastWeek => 24 * 7,
            Self::LastMonth => 24 * 30,
        }
    }

    #[must_use]
    pub fn duration(self) -> TimeDelta {
        TimeDelta::hours(self.hours())
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown time window {0:?} (expected one of 1h, 3h, 12h, 1d, 7d, 1m)")]
pub struct UnknownWindow(pub String);

impl FromStr for TimeWindow {
    type Err = UnknownWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|w| w.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| UnknownWindow(s.to_string()))
    }
}

/// Selector entry exposed to the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WindowOption {
    pub key: String,
    pub label: String,
    pub hours: i64,
}

impl From<TimeWindow> for WindowOption {
    fn from(window: TimeWindow) -> Self {
        Self {
            key: window.key().to_string(),
            label: window.label().to_string(),
            hours: window.hours(),
        }
    }
}

#[must_use]
pub fn window_options() -> Vec<WindowOption> {
    TimeWindow::ALL.into_iter().map(WindowOption::from).collect()
}
