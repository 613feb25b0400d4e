// View model - Maps fetch state to cards, charts and tables
use chrono::Local;
use crate::application::refresh_scheduler::SchedulerPhase;
use crate::domain::fetch_state::FetchState;
use crate::domain::metrics::{DashboardStats, UserMetric};
use serde::Serialize;

pub const DASHBOARD_TITLE: &str = "Issue Dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Accent {
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Icon {
    Activity,
    AlertTriangle,
    CheckCircle,
    Calendar,
    TrendingUp,
    Users,
    BarChart,
    PieChart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BadgeTier {
    High,
    Medium,
    Low,
    Critical,
    Warning,
    Notice,
}

/// Which metric the middle table column shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricColumn {
    CompletionRate,
    OverdueIssues,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub title: &'static str,
    pub last_updated: String,
    pub refreshing: bool,
    pub phase: SchedulerPhase,
    /// Nothing to show yet; render a full-page spinner
    pub initial_load: bool,
    pub connection_error: Option<ConnectionErrorBanner>,
    pub stat_cards: Vec<StatCard>,
    pub completion_chart: Section<CompletionChart>,
    pub status_chart: Section<StatusChart>,
    pub tables: Vec<UserTable>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionErrorBanner {
    pub title: &'static str,
    pub message: String,
    pub detail: String,
    pub retry_label: &'static str,
    pub retry_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub accent: Accent,
    pub icon: Icon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyState {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: Icon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum Section<T> {
    Chart(T),
    Empty(EmptyState),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionChart {
    pub title: &'static str,
    pub bars: Vec<CompletionBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionBar {
    pub name: String,
    pub completion_rate: f64,
    pub completed: u32,
    pub active: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChart {
    pub title: &'static str,
    pub slices: Vec<StatusSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSlice {
    pub name: &'static str,
    pub value: u64,
    pub percent: u32,
    pub accent: Accent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTable {
    pub title: &'static str,
    pub icon: Icon,
    pub column: MetricColumn,
    pub column_label: &'static str,
    pub rows: Vec<UserRow>,
    pub empty_state: Option<EmptyState>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub username: String,
    pub initials: String,
    pub display_name: String,
    pub handle: String,
    pub badge: String,
    pub badge_tier: BadgeTier,
    pub active_issues: u32,
    /// Activity bar width in percent
    pub activity_width: u32,
}

pub fn build_view(state: &FetchState, phase: SchedulerPhase, rows: usize) -> DashboardView {
    DashboardView {
        title: DASHBOARD_TITLE,
        last_updated: state
            .last_updated
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string(),
        refreshing: state.loading,
        phase,
        initial_load: state.loading && state.stats.is_none(),
        connection_error: state.error.as_ref().map(|e| ConnectionErrorBanner {
            title: "Backend Connection Error",
            message: "Cannot reach the metrics API. Make sure the backend service is running."
                .to_string(),
            detail: e.clone(),
            retry_label: if state.loading { "Retrying..." } else { "Retry" },
            retry_enabled: !state.loading,
        }),
        stat_cards: state.stats.as_ref().map(stat_cards).unwrap_or_default(),
        completion_chart: completion_chart(&state.top_performers),
        status_chart: status_chart(state.stats.as_ref()),
        tables: vec![
            user_table(
                "Top Performers",
                Icon::TrendingUp,
                MetricColumn::CompletionRate,
                &state.top_performers,
                rows,
            ),
            user_table(
                "Users With Overdue Issues",
                Icon::AlertTriangle,
                MetricColumn::OverdueIssues,
                &state.overdue_users,
                rows,
            ),
            user_table(
                "Most Active Users",
                Icon::Activity,
                MetricColumn::CompletionRate,
                &state.most_active,
                rows,
            ),
        ],
    }
}

fn stat_cards(stats: &DashboardStats) -> Vec<StatCard> {
    let card = |title: &'static str, value: String, accent: Accent, icon: Icon| StatCard {
        title,
        value,
        accent,
        icon,
    };

    vec![
        card("Total Issues", stats.total_issues.to_string(), Accent::Blue, Icon::Activity),
        card("Open Issues", stats.open_issues.to_string(), Accent::Yellow, Icon::AlertTriangle),
        card("Closed Issues", stats.closed_issues.to_string(), Accent::Green, Icon::CheckCircle),
        card("Overdue Issues", stats.overdue_issues.to_string(), Accent::Red, Icon::Calendar),
        card(
            "Avg. Completion",
            format!("{} days", stats.avg_completion_time),
            Accent::Purple,
            Icon::TrendingUp,
        ),
        card("Active Users", stats.active_users.to_string(), Accent::Blue, Icon::Users),
    ]
}

fn completion_chart(performers: &[UserMetric]) -> Section<CompletionChart> {
    if performers.is_empty() {
        return Section::Empty(EmptyState {
            title: "No Performance Data",
            description: "User performance data could not be loaded from the backend.",
            icon: Icon::BarChart,
        });
    }

    Section::Chart(CompletionChart {
        title: "Top Performing Users",
        bars: performers
            .iter()
            .map(|u| CompletionBar {
                name: u.full_name(),
                completion_rate: u.completion_rate,
                completed: u.completed_issue_count,
                active: u.active_issue_count,
            })
            .collect(),
    })
}

fn status_chart(stats: Option<&DashboardStats>) -> Section<StatusChart> {
    let Some(stats) = stats else {
        return Section::Empty(EmptyState {
            title: "No Statistics",
            description: "Issue status data could not be loaded from the backend.",
            icon: Icon::PieChart,
        });
    };

    let parts = [
        ("Open Issues", stats.open_issues, Accent::Blue),
        ("Closed Issues", stats.closed_issues, Accent::Green),
        ("Overdue Issues", stats.overdue_issues, Accent::Red),
    ];
    let total: u64 = parts.iter().map(|(_, value, _)| value).sum();

    Section::Chart(StatusChart {
        title: "Issue Status Distribution",
        slices: parts
            .into_iter()
            .map(|(name, value, accent)| StatusSlice {
                name,
                value,
                percent: percent_of(value, total),
                accent,
            })
            .collect(),
    })
}

fn percent_of(value: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (value as f64 / total as f64 * 100.0).round() as u32
}

fn user_table(
    title: &'static str,
    icon: Icon,
    column: MetricColumn,
    users: &[UserMetric],
    rows: usize,
) -> UserTable {
    let column_label = match column {
        MetricColumn::CompletionRate => "Completion Rate",
        MetricColumn::OverdueIssues => "Overdue Issues",
    };
    let empty_state = users.is_empty().then_some(EmptyState {
        title: "No Users",
        description: "No user data is available for this table.",
        icon,
    });

    UserTable {
        title,
        icon,
        column,
        column_label,
        rows: users.iter().take(rows).map(|u| user_row(u, column)).collect(),
        empty_state,
    }
}

fn user_row(user: &UserMetric, column: MetricColumn) -> UserRow {
    let (badge, badge_tier) = match column {
        MetricColumn::CompletionRate => (
            format!("{:.1}%", user.completion_rate),
            completion_tier(user.completion_rate),
        ),
        MetricColumn::OverdueIssues => (
            user.overdue_issue_count.to_string(),
            overdue_tier(user.overdue_issue_count),
        ),
    };

    UserRow {
        username: user.username.clone(),
        initials: user.initials(),
        display_name: user.full_name(),
        handle: format!("@{}", user.username),
        badge,
        badge_tier,
        active_issues: user.active_issue_count,
        activity_width: activity_width(user.active_issue_count),
    }
}

pub fn completion_tier(rate: f64) -> BadgeTier {
    if rate >= 90.0 {
        BadgeTier::High
    } else if rate >= 70.0 {
        BadgeTier::Medium
    } else {
        BadgeTier::Low
    }
}

pub fn overdue_tier(count: u32) -> BadgeTier {
    if count > 10 {
        BadgeTier::Critical
    } else if count > 5 {
        BadgeTier::Warning
    } else {
        BadgeTier::Notice
    }
}

pub fn activity_width(active_issues: u32) -> u32 {
    active_issues.saturating_mul(4).min(100)
}
