pub mod dashboard;
pub mod health;
pub mod readings;
pub mod windows;

use axum::{
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;

/// Request bodies are tiny window selections
const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        dashboard::get_dashboard,
        windows::list_windows,
        windows::select_window,
        readings::get_readings,
    ),
    components(
        schemas(
            crate::view::DashboardView,
            crate::view::WindowOption,
            crate::dashboard::FeedStatus,
            windows::SelectWindowRequest,
            readings::ReadingsResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "dashboard", description = "Dashboard view model and window selection"),
        (name = "readings", description = "Raw sensor readings"),
    ),
    info(
        title = "Climinha API",
        description = "Temperature sensor dashboard",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/windows", get(windows::list_windows))
        .route("/window", put(windows::select_window))
        .route("/readings", get(readings::get_readings))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    // Health check routes
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Combine all routes
    Router::new()
        .route("/", get(dashboard::dashboard))
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
