// HTTP request handlers
use axum::{Json, extract::State, http::StatusCode};
use crate::domain::fetch_state::FetchState;
use crate::presentation::app_state::AppState;
use crate::presentation::view::{DashboardView, build_view};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Raw fetch state
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<FetchState> {
    Json(state.scheduler.service().state())
}

/// Dashboard view model
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    let fetch_state = state.scheduler.service().state();
    Json(build_view(
        &fetch_state,
        state.scheduler.phase(),
        state.display_rows,
    ))
}

/// Manual refresh, independent of the periodic timer
pub async fn trigger_refresh(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.scheduler.trigger_manual() {
        StatusCode::ACCEPTED
    } else {
        tracing::warn!("Manual refresh requested while scheduler is inactive");
        StatusCode::SERVICE_UNAVAILABLE
    }
}
