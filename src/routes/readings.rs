use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::sensor::Reading;
use crate::view::{filter_window, TimeWindow};

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadingsResponse {
    pub window: TimeWindow,
    /// Oldest instant still inside the window
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Readings inside the window, in backend order
    pub readings: Vec<Reading>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReadingsQuery {
    /// Window key (1h, 3h, 12h, 1d, 7d, 1m). Defaults to the selected window;
    /// does not change the selection.
    pub window: Option<String>,
}

/// Get the raw readings of a time window
#[utoipa::path(
    get,
    path = "/api/readings",
    params(ReadingsQuery),
    responses(
        (status = 200, description = "Readings retrieved successfully", body = ReadingsResponse),
        (status = 400, description = "Unknown window"),
    ),
    tag = "readings"
)]
pub async fn get_readings(
    State(state): State<AppState>,
    Query(query): Query<ReadingsQuery>,
) -> AppResult<Json<ReadingsResponse>> {
    let snapshot = state.dashboard.snapshot();

    let window = match query.window.as_deref() {
        Some(key) => key
            .parse::<TimeWindow>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
        None => snapshot.window,
    };

    let now = Utc::now();
    let readings = filter_window(
        &snapshot.history,
        window,
        now,
        &state.config.display_timezone,
    )
    .into_iter()
    .map(|t| t.reading.clone())
    .collect();

    Ok(Json(ReadingsResponse {
        window,
        start: now - window.duration(),
        end: now,
        readings,
    }))
}
