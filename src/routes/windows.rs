use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::view::{window_options, DashboardView, TimeWindow, WindowOption};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectWindowRequest {
    /// Window key: 1h, 3h, 12h, 1d, 7d or 1m
    pub window: String,
}

/// List the selectable time windows
#[utoipa::path(
    get,
    path = "/api/windows",
    responses(
        (status = 200, description = "Available windows", body = Vec<WindowOption>),
    ),
    tag = "dashboard"
)]
pub async fn list_windows() -> Json<Vec<WindowOption>> {
    Json(window_options())
}

/// Select the time window used for the chart
#[utoipa::path(
    put,
    path = "/api/window",
    request_body = SelectWindowRequest,
    responses(
        (status = 200, description = "Window selected, updated view returned", body = DashboardView),
        (status = 400, description = "Unknown window"),
    ),
    tag = "dashboard"
)]
pub async fn select_window(
    State(state): State<AppState>,
    Json(request): Json<SelectWindowRequest>,
) -> AppResult<Json<DashboardView>> {
    let window = request
        .window
        .parse::<TimeWindow>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let snapshot = state.dashboard.select_window(window).await?;
    tracing::info!(window = %window, "Time window selected");

    Ok(Json(DashboardView::build(
        &snapshot,
        Utc::now(),
        &state.config.display_timezone,
    )))
}
