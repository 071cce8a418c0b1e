use reqwest::Client;
use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::sensor::models::Reading;

/// Anything the poller can pull a full reading list from.
pub trait ReadingSource: Send + Sync + 'static {
    /// Fetch the complete reading history currently held by the backend.
    fn fetch_readings(&self) -> impl Future<Output = AppResult<Vec<Reading>>> + Send;
}

pub struct TemperatureClient {
    http_client: Client,
    readings_url: String,
}

impl TemperatureClient {
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.sensor_http_timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            readings_url: config.readings_url(),
        })
    }

    #[must_use]
    pub fn readings_url(&self) -> &str {
        &self.readings_url
    }

    /// Get the reading list from the sensor backend.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Upstream` if the request fails, the backend answers
    /// with an error status, or the body is not a JSON array of readings.
    pub async fn get_readings(&self) -> AppResult<Vec<Reading>> {
        let response = self
            .http_client
            .get(&self.readings_url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to get response text: {e}")))?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body_preview = %text.chars().take(500).collect::<String>(),
                "Failed to parse readings response"
            );
            AppError::Upstream(format!("Failed to parse response: {e}"))
        })
    }
}

impl ReadingSource for TemperatureClient {
    async fn fetch_readings(&self) -> AppResult<Vec<Reading>> {
        self.get_readings().await
    }
}
