// HTTP repository implementation for the dashboard REST API
use anyhow::Context;
use async_trait::async_trait;
use crate::application::dashboard_repository::{DashboardRepository, FetchError};
use crate::domain::metrics::{DashboardStats, UserMetric};
use serde::de::DeserializeOwned;
use std::time::Duration;

const STATS: &str = "stats";
const TOP_PERFORMERS: &str = "top-performers";
const OVERDUE_ISSUES: &str = "overdue-issues";
const MOST_ACTIVE: &str = "most-active";

#[derive(Debug, Clone)]
pub struct HttpDashboardRepository {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDashboardRepository {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/dashboard/{}", self.base_url, endpoint)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        limit: Option<usize>,
    ) -> Result<T, FetchError> {
        let mut request = self
            .client
            .get(self.endpoint_url(endpoint))
            .header("Accept", "application/json");
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }

        tracing::debug!(endpoint, "Requesting dashboard endpoint");
        let response = request.send().await.map_err(|e| FetchError::Network {
            endpoint,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Network {
            endpoint,
            message: e.to_string(),
        })?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Parse {
            endpoint,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl DashboardRepository for HttpDashboardRepository {
    async fn fetch_stats(&self) -> Result<DashboardStats, FetchError> {
        self.get_json(STATS, None).await
    }

    async fn fetch_top_performers(&self, limit: usize) -> Result<Vec<UserMetric>, FetchError> {
        self.get_json(TOP_PERFORMERS, Some(limit)).await
    }

    async fn fetch_overdue_users(&self) -> Result<Vec<UserMetric>, FetchError> {
        self.get_json(OVERDUE_ISSUES, None).await
    }

    async fn fetch_most_active(&self, limit: usize) -> Result<Vec<UserMetric>, FetchError> {
        self.get_json(MOST_ACTIVE, Some(limit)).await
    }
}
