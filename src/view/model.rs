use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use utoipa::ToSchema;

use crate::dashboard::{DashboardSnapshot, FeedStatus};
use crate::sensor::Reading;
use crate::view::filter::filter_window;
use crate::view::window::{window_options, WindowOption};

/// Below this the current reading is shown as cool
pub const COOL_BELOW_C: f64 = 18.0;
/// Above this the current reading is shown as warm
pub const WARM_ABOVE_C: f64 = 22.0;

/// Label used when a timestamp cannot be parsed
pub const INVALID_DATE_LABEL: &str = "Data inválida";

/// Fixed y-axis range of the history chart, in °C
pub const CHART_Y_MIN: f64 = 0.0;
pub const CHART_Y_MAX: f64 = 50.0;

pub const SERIES_LABEL: &str = "Temperatura (°C)";
pub const SERIES_COLOR: &str = "rgba(75,192,192,1)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TempClass {
    Cool,
    Neutral,
    Warm,
}

impl TempClass {
    /// Threshold classification: strictly below 18 °C is cool, strictly above
    /// 22 °C is warm, everything else (NaN included) is neutral.
    #[must_use]
    pub fn classify(temp: f64) -> Self {
        if temp < COOL_BELOW_C {
            Self::Cool
        } else if temp > WARM_ABOVE_C {
            Self::Warm
        } else {
            Self::Neutral
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Cool => "#3b82f6",
            Self::Neutral => "#10b981",
            Self::Warm => "#ef4444",
        }
    }
}

/// pt-BR date-time label (`dd/mm/aaaa, hh:mm:ss`) in the display zone.
#[must_use]
pub fn format_label(at: DateTime<Utc>, tz: &Tz) -> String {
    at.with_timezone(tz)
        .format("%d/%m/%Y, %H:%M:%S")
        .to_string()
}

#[must_use]
pub fn format_temp(temp: f64) -> String {
    format!("{temp:.1}°C")
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CurrentReadingView {
    pub temp: f64,
    /// Temperature with one decimal, e.g. `21.3°C`
    pub display: String,
    /// Raw timestamp from the backend
    pub timestamp: String,
    /// Formatted timestamp
    pub label: String,
    pub class: TempClass,
    pub color: String,
}

impl CurrentReadingView {
    #[must_use]
    pub fn from_reading(reading: &Reading, tz: &Tz) -> Self {
        let class = TempClass::classify(reading.temp);
        let label = reading.instant(tz).map_or_else(
            || INVALID_DATE_LABEL.to_string(),
            |at| format_label(at, tz),
        );

        Self {
            temp: reading.temp,
            display: format_temp(reading.temp),
            timestamp: reading.timestamp.clone(),
            label,
            class,
            color: class.color().to_string(),
        }
    }
}

/// Parallel label/value arrays for the history chart.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartSeries {
    pub label: String,
    pub color: String,
    /// Formatted timestamps, one per value
    pub labels: Vec<String>,
    /// Temperatures in °C
    pub values: Vec<f64>,
    /// False when nothing falls in the selected window
    pub has_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartOptions {
    pub y_min: f64,
    pub y_max: f64,
    /// Axis that pan and zoom act on
    pub zoom_mode: String,
    pub pan: bool,
    pub wheel_zoom: bool,
    pub pinch_zoom: bool,
    /// Line smoothing passed through to the renderer
    pub tension: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            y_min: CHART_Y_MIN,
            y_max: CHART_Y_MAX,
            zoom_mode: "x".to_string(),
            pan: true,
            wheel_zoom: true,
            pinch_zoom: true,
            tension: 0.3,
        }
    }
}

/// Everything the page needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardView {
    pub window: WindowOption,
    pub windows: Vec<WindowOption>,
    /// Latest reading, `null` until the first successful poll
    pub current: Option<CurrentReadingView>,
    pub series: ChartSeries,
    pub chart: ChartOptions,
    /// Seconds until the next refresh
    pub countdown: u32,
    pub status: FeedStatus,
    pub generated_at: DateTime<Utc>,
}

impl DashboardView {
    /// Derive the view from a snapshot. Nothing is cached; this is cheap for
    /// the history sizes a month of sampling produces.
    #[must_use]
    pub fn build(snapshot: &DashboardSnapshot, now: DateTime<Utc>, tz: &Tz) -> Self {
        let filtered = filter_window(&snapshot.history, snapshot.window, now, tz);

        let (labels, values): (Vec<String>, Vec<f64>) = filtered
            .iter()
            .map(|t| (format_label(t.at, tz), t.reading.temp))
            .unzip();

        Self {
            window: snapshot.window.into(),
            windows: window_options(),
            current: snapshot
                .current
                .as_ref()
                .map(|r| CurrentReadingView::from_reading(r, tz)),
            series: ChartSeries {
                label: SERIES_LABEL.to_string(),
                color: SERIES_COLOR.to_string(),
                has_data: !values.is_empty(),
                labels,
                values,
            },
            chart: ChartOptions::default(),
            countdown: snapshot.countdown,
            status: snapshot.status.clone(),
            generated_at: now,
        }
    }
}
