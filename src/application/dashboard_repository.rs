// Repository trait for the upstream dashboard API
use async_trait::async_trait;
use crate::domain::metrics::{DashboardStats, UserMetric};
use thiserror::Error;

/// Why a single upstream request failed
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {message}")]
    Network {
        endpoint: &'static str,
        message: String,
    },

    #[error("{endpoint} responded with status {status}")]
    HttpStatus { endpoint: &'static str, status: u16 },

    #[error("could not parse {endpoint} response: {message}")]
    Parse {
        endpoint: &'static str,
        message: String,
    },
}

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Aggregate issue counters
    async fn fetch_stats(&self) -> Result<DashboardStats, FetchError>;

    /// Users ordered by completion rate, descending
    async fn fetch_top_performers(&self, limit: usize) -> Result<Vec<UserMetric>, FetchError>;

    /// Users ordered by overdue issue count, descending
    async fn fetch_overdue_users(&self) -> Result<Vec<UserMetric>, FetchError>;

    /// Users ordered by active issue count, descending
    async fn fetch_most_active(&self, limit: usize) -> Result<Vec<UserMetric>, FetchError>;
}
