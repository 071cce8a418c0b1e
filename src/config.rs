use std::env;
use std::time::Duration;

use chrono_tz::Tz;

use crate::view::TimeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }

    /// Stage and prod ship logs to an aggregator, so they log JSON.
    #[must_use]
    pub fn json_logs(self) -> bool {
        matches!(self, Self::Stage | Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Sensor backend
    pub sensor_base_url: String,
    pub sensor_readings_path: String,
    pub sensor_http_timeout_seconds: u64,

    // Polling
    pub poll_interval_seconds: u64,

    // View
    pub default_window: TimeWindow,
    pub display_timezone: Tz,

    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `SENSOR_API_URL` is not set and
    /// `ConfigError::Invalid` if the window or time zone cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let default_window = parse_default_window(
            &env::var("DEFAULT_WINDOW").unwrap_or_else(|_| "1h".to_string()),
        )?;
        let display_timezone = parse_display_timezone(
            &env::var("DISPLAY_TIMEZONE").unwrap_or_else(|_| "America/Sao_Paulo".to_string()),
        )?;

        Ok(Self {
            // Sensor backend
            sensor_base_url: env::var("SENSOR_API_URL")
                .map_err(|_| ConfigError::Missing("SENSOR_API_URL"))?,
            sensor_readings_path: env::var("SENSOR_READINGS_PATH")
                .unwrap_or_else(|_| "/temperatura".to_string()),
            sensor_http_timeout_seconds: env::var("SENSOR_HTTP_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // Polling
            poll_interval_seconds: env::var("POLL_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .unwrap_or(30),

            // View
            default_window,
            display_timezone,

            // API settings
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            // Application metadata
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        })
    }

    /// Configuration with every optional setting at its default, pointed at
    /// the given sensor backend.
    #[must_use]
    pub fn with_sensor_url(sensor_base_url: impl Into<String>) -> Self {
        Self {
            sensor_base_url: sensor_base_url.into(),
            sensor_readings_path: "/temperatura".to_string(),
            sensor_http_timeout_seconds: 10,
            poll_interval_seconds: 30,
            default_window: TimeWindow::default(),
            display_timezone: chrono_tz::America::Sao_Paulo,
            api_host: "0.0.0.0".to_string(),
            api_port: 3000,
            deployment: Deployment::Local,
        }
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    #[must_use]
    pub fn readings_url(&self) -> String {
        format!(
            "{}{}",
            self.sensor_base_url.trim_end_matches('/'),
            self.sensor_readings_path
        )
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    /// The refresh countdown restarts from the poll interval.
    #[must_use]
    pub fn countdown_max(&self) -> u32 {
        u32::try_from(self.poll_interval_seconds).unwrap_or(u32::MAX)
    }
}

/// # Errors
///
/// Returns `ConfigError::Invalid` for a key that is not a known window.
pub fn parse_default_window(raw: &str) -> Result<TimeWindow, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        var: "DEFAULT_WINDOW",
        value: raw.to_string(),
    })
}

/// # Errors
///
/// Returns `ConfigError::Invalid` for a name missing from the IANA database.
pub fn parse_display_timezone(raw: &str) -> Result<Tz, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        var: "DISPLAY_TIMEZONE",
        value: raw.to_string(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
