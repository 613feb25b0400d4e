// View state for the dashboard and the single transition that updates it
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use super::metrics::{DashboardSnapshot, DashboardStats, UserMetric};
use super::sample::sample_snapshot;

/// What happens to the displayed data when a refresh cycle fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Drop stats and empty every list
    #[default]
    Clear,
    /// Show the embedded placeholder data set
    Sample,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Manual,
    Automatic,
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshTrigger::Manual => f.write_str("manual"),
            RefreshTrigger::Automatic => f.write_str("automatic"),
        }
    }
}

/// Result of one fan-out/fan-in cycle
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Success(DashboardSnapshot),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState {
    pub stats: Option<DashboardStats>,
    pub top_performers: Vec<UserMetric>,
    pub overdue_users: Vec<UserMetric>,
    pub most_active: Vec<UserMetric>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: DateTime<Utc>,
    #[serde(skip)]
    in_flight: usize,
}

impl FetchState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            stats: None,
            top_performers: Vec::new(),
            overdue_users: Vec::new(),
            most_active: Vec::new(),
            loading: false,
            error: None,
            last_updated: now,
            in_flight: 0,
        }
    }

    /// Marks a cycle as started. Returns false if another cycle was already running.
    pub fn begin_refresh(&mut self) -> bool {
        let was_idle = self.in_flight == 0;
        self.in_flight += 1;
        self.loading = true;
        was_idle
    }

    pub fn finish_refresh(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }

    /// Apply a cycle outcome to all four data fields at once.
    pub fn apply(&mut self, outcome: CycleOutcome, policy: FallbackPolicy, now: DateTime<Utc>) {
        match outcome {
            CycleOutcome::Success(snapshot) => {
                self.replace_data(Some(snapshot));
                self.error = None;
                self.last_updated = now;
            }
            CycleOutcome::Failure(message) => {
                let fallback = match policy {
                    FallbackPolicy::Clear => None,
                    FallbackPolicy::Sample => Some(sample_snapshot()),
                };
                self.replace_data(fallback);
                self.error = Some(message);
            }
        }
    }

    fn replace_data(&mut self, snapshot: Option<DashboardSnapshot>) {
        match snapshot {
            Some(s) => {
                self.stats = Some(s.stats);
                self.top_performers = s.top_performers;
                self.overdue_users = s.overdue_users;
                self.most_active = s.most_active;
            }
            None => {
                self.stats = None;
                self.top_performers.clear();
                self.overdue_users.clear();
                self.most_active.clear();
            }
        }
    }
}
