use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use climinha::common::AppState;
use climinha::config::{Config, Deployment};
use climinha::dashboard::{self, DashboardStore};
use climinha::routes;
use climinha::sensor::TemperatureClient;
use climinha::sync;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (fail-fast)
    let config = Config::from_env()?;

    init_tracing(config.deployment);

    tracing::info!("Starting climinha...");
    tracing::info!(
        deployment = ?config.deployment,
        sensor_url = %config.readings_url(),
        poll_interval_secs = config.poll_interval_seconds,
        default_window = %config.default_window,
        timezone = %config.display_timezone,
        "Configuration loaded"
    );

    // Create sensor client
    let client = TemperatureClient::new(&config)?;
    tracing::info!("Sensor client initialized");

    // Start the dashboard state task and the timers feeding it
    let (dashboard, _dashboard_task) = dashboard::spawn(DashboardStore::new(
        config.default_window,
        config.countdown_max(),
    ));
    let poller = sync::start(dashboard.clone(), Arc::new(client), config.poll_interval()).await?;

    // Build router
    let addr = config.bind_address();
    let state = AppState::new(config, dashboard);
    let app = routes::build_router(state);

    // Start server with graceful shutdown
    tracing::info!(address = %addr, "Starting server");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poller.shutdown().await;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

fn init_tracing(deployment: Deployment) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,climinha=debug".into());

    if deployment.json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
