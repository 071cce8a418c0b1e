//! Window filter and dashboard view model.

pub mod filter;
pub mod model;
pub mod window;

pub use filter::{filter_window, TimedReading};
pub use model::{
    format_label, format_temp, ChartOptions, ChartSeries, CurrentReadingView, DashboardView,
    TempClass,
};
pub use window::{window_options, TimeWindow, UnknownWindow, WindowOption};
