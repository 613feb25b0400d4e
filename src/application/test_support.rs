// Scripted repository used by service and scheduler tests
use async_trait::async_trait;
use crate::application::dashboard_repository::{DashboardRepository, FetchError};
use crate::domain::metrics::{DashboardStats, UserMetric};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn stats() -> DashboardStats {
    DashboardStats {
        total_issues: 1250,
        open_issues: 320,
        closed_issues: 930,
        overdue_issues: 45,
        avg_completion_time: 5.2,
        active_users: 28,
    }
}

pub fn user(username: &str, completion_rate: f64, active: u32, overdue: u32) -> UserMetric {
    UserMetric {
        username: username.to_string(),
        first_name: "First".to_string(),
        last_name: "Last".to_string(),
        completion_rate,
        completed_issue_count: 10,
        active_issue_count: active,
        overdue_issue_count: overdue,
    }
}

pub struct StubRepository {
    pub stats: Mutex<Result<DashboardStats, FetchError>>,
    pub top_performers: Mutex<Result<Vec<UserMetric>, FetchError>>,
    pub overdue_users: Mutex<Result<Vec<UserMetric>, FetchError>>,
    pub most_active: Mutex<Result<Vec<UserMetric>, FetchError>>,
    pub delay: Option<Duration>,
    stats_calls: AtomicUsize,
    last_limits: Mutex<(usize, usize)>,
}

impl StubRepository {
    pub fn healthy() -> Self {
        Self {
            stats: Mutex::new(Ok(stats())),
            top_performers: Mutex::new(Ok(vec![
                user("ahmet.yilmaz", 95.2, 3, 0),
                user("ayse.kaya", 92.8, 5, 0),
            ])),
            overdue_users: Mutex::new(Ok(vec![user("can.arslan", 40.0, 12, 8)])),
            most_active: Mutex::new(Ok(vec![user("ahmet.yilmaz", 95.2, 15, 0)])),
            delay: None,
            stats_calls: AtomicUsize::new(0),
            last_limits: Mutex::new((0, 0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of refresh cycles that reached the stats endpoint
    pub fn cycles(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    pub fn last_limits(&self) -> (usize, usize) {
        *self.last_limits.lock().unwrap()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl DashboardRepository for StubRepository {
    async fn fetch_stats(&self) -> Result<DashboardStats, FetchError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.stats.lock().unwrap().clone()
    }

    async fn fetch_top_performers(&self, limit: usize) -> Result<Vec<UserMetric>, FetchError> {
        self.last_limits.lock().unwrap().0 = limit;
        self.pause().await;
        self.top_performers.lock().unwrap().clone()
    }

    async fn fetch_overdue_users(&self) -> Result<Vec<UserMetric>, FetchError> {
        self.pause().await;
        self.overdue_users.lock().unwrap().clone()
    }

    async fn fetch_most_active(&self, limit: usize) -> Result<Vec<UserMetric>, FetchError> {
        self.last_limits.lock().unwrap().1 = limit;
        self.pause().await;
        self.most_active.lock().unwrap().clone()
    }
}
