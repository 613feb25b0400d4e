// Application state for HTTP handlers
use crate::application::refresh_scheduler::RefreshScheduler;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<RefreshScheduler>,
    /// Rows shown per user table
    pub display_rows: usize,
}
