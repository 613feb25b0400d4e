// Issue-tracking metric models returned by the dashboard API
use serde::{Deserialize, Serialize};

/// Aggregate issue counters for the whole workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_issues: u64,
    pub open_issues: u64,
    pub closed_issues: u64,
    pub overdue_issues: u64,
    /// Average completion time in days
    pub avg_completion_time: f64,
    pub active_users: u64,
}

/// Per-user performance row. Endpoints send partial projections, so every
/// counter defaults to zero when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetric {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub completed_issue_count: u32,
    #[serde(default)]
    pub active_issue_count: u32,
    #[serde(default)]
    pub overdue_issue_count: u32,
}

impl UserMetric {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// First character of the first and last name, e.g. "AY"
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect()
    }
}

/// The four payloads of one successful refresh cycle
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub top_performers: Vec<UserMetric>,
    pub overdue_users: Vec<UserMetric>,
    pub most_active: Vec<UserMetric>,
}
