//! Sensor backend: wire model and HTTP client.

pub mod client;
pub mod models;

pub use client::{ReadingSource, TemperatureClient};
pub use models::{parse_timestamp, Reading};
