// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use axum::{Router, routing::{get, post}};
use std::{net::SocketAddr, sync::Arc};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::refresh_scheduler::RefreshScheduler;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_repository::HttpDashboardRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_dashboard, get_state, health_check, trigger_refresh};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpDashboardRepository::new(
        &config.api.base_url,
        config.request_timeout(),
    )?);

    // Create services (application layer)
    let service = DashboardService::new(repository, config.refresh_settings());
    let scheduler = Arc::new(RefreshScheduler::new(service, config.refresh_interval()));

    let state = Arc::new(AppState {
        scheduler: scheduler.clone(),
        display_rows: config.display.rows,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/state", get(get_state))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/refresh", post(trigger_refresh))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.server.bind.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, upstream = %config.api.base_url, "Starting issue-dashboard service");

    scheduler.activate();

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.deactivate().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
