//! HTTP API tests driven through the router without a listener.
//!
//! Run with: cargo test --test api_test

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeDelta, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use climinha::common::AppState;
use climinha::config::Config;
use climinha::dashboard::{self, DashboardEvent, DashboardHandle, DashboardStore};
use climinha::routes::build_router;
use climinha::sensor::Reading;
use climinha::view::TimeWindow;

async fn test_app() -> (Router, DashboardHandle) {
    let config = Config::with_sensor_url("http://sensor.invalid");
    let (dashboard, _task) = dashboard::spawn(DashboardStore::new(
        config.default_window,
        config.countdown_max(),
    ));
    dashboard.apply(DashboardEvent::Activated).await.unwrap();

    let app = build_router(AppState::new(config, dashboard.clone()));
    (app, dashboard)
}

async fn load_readings(dashboard: &DashboardHandle) -> Vec<Reading> {
    let now = Utc::now();
    let readings = vec![
        Reading::new((now - TimeDelta::hours(2)).to_rfc3339(), 16.0),
        Reading::new((now - TimeDelta::minutes(30)).to_rfc3339(), 19.0),
        Reading::new((now - TimeDelta::minutes(1)).to_rfc3339(), 23.4),
    ];

    let seq = dashboard.begin_poll().await.unwrap();
    dashboard
        .apply(DashboardEvent::PollFinished {
            seq,
            outcome: Ok(readings.clone()),
        })
        .await
        .unwrap();
    readings
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put_window(key: &str) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri("/api/window")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "window": key }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn healthz_is_ok_while_dashboard_runs() {
    let (app, _dashboard) = test_app().await;
    let response = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn dashboard_before_first_poll_is_loading() {
    let (app, _dashboard) = test_app().await;

    let (status, body) = send(&app, get("/api/dashboard")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current"], Value::Null);
    assert_eq!(body["series"]["has_data"], json!(false));
    assert_eq!(body["status"]["state"], json!("loading"));
    assert_eq!(body["countdown"], json!(30));
    assert_eq!(body["window"]["key"], json!("1h"));
}

#[tokio::test]
async fn dashboard_shows_last_hour_and_current_reading() {
    let (app, dashboard) = test_app().await;
    load_readings(&dashboard).await;

    let (status, body) = send(&app, get("/api/dashboard")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["series"]["values"], json!([19.0, 23.4]));
    assert_eq!(body["series"]["labels"].as_array().unwrap().len(), 2);
    assert_eq!(body["current"]["display"], json!("23.4°C"));
    assert_eq!(body["current"]["class"], json!("warm"));
    assert_eq!(body["current"]["color"], json!("#ef4444"));
    assert_eq!(body["status"]["state"], json!("live"));
    assert_eq!(body["chart"]["y_max"], json!(50.0));
}

#[tokio::test]
async fn selecting_a_window_widens_the_series() {
    let (app, dashboard) = test_app().await;
    load_readings(&dashboard).await;

    let (status, body) = send(&app, put_window("3h")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"]["key"], json!("3h"));
    assert_eq!(body["window"]["label"], json!("Últimas 3 horas"));
    assert_eq!(body["series"]["values"], json!([16.0, 19.0, 23.4]));

    // Selection sticks for later reads
    assert_eq!(dashboard.snapshot().window, TimeWindow::LastThreeHours);
    let (_, body) = send(&app, get("/api/dashboard")).await;
    assert_eq!(body["series"]["values"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn unknown_window_is_rejected() {
    let (app, dashboard) = test_app().await;

    let (status, body) = send(&app, put_window("2h")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("2h"));
    assert_eq!(dashboard.snapshot().window, TimeWindow::LastHour);
}

#[tokio::test]
async fn windows_are_listed_in_selector_order() {
    let (app, _dashboard) = test_app().await;

    let (status, body) = send(&app, get("/api/windows")).await;

    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["1h", "3h", "12h", "1d", "7d", "1m"]);
}

#[tokio::test]
async fn readings_endpoint_filters_without_changing_selection() {
    let (app, dashboard) = test_app().await;
    let readings = load_readings(&dashboard).await;

    let (status, body) = send(&app, get("/api/readings?window=1d")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"], json!("1d"));
    assert_eq!(body["readings"], serde_json::to_value(&readings).unwrap());
    assert_eq!(dashboard.snapshot().window, TimeWindow::LastHour);

    let (_, body) = send(&app, get("/api/readings")).await;
    assert_eq!(body["readings"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, get("/api/readings?window=1y")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stale_feed_is_reported() {
    let (app, dashboard) = test_app().await;
    load_readings(&dashboard).await;

    let seq = dashboard.begin_poll().await.unwrap();
    dashboard
        .apply(DashboardEvent::PollFinished {
            seq,
            outcome: Err("Sensor API error: HTTP 502".to_string()),
        })
        .await
        .unwrap();

    let (_, body) = send(&app, get("/api/dashboard")).await;
    assert_eq!(body["status"]["state"], json!("stale"));
    assert_eq!(body["status"]["error"], json!("Sensor API error: HTTP 502"));
    assert_eq!(body["current"]["display"], json!("23.4°C"));
}

#[tokio::test]
async fn page_is_served() {
    let (app, _dashboard) = test_app().await;

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Climinha"));
    assert!(html.contains("/api/dashboard"));
}
