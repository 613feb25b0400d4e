// Illustrative placeholder data shown when the backend is unreachable
use super::metrics::{DashboardSnapshot, DashboardStats, UserMetric};

fn user(
    username: &str,
    first_name: &str,
    last_name: &str,
    completion_rate: f64,
    completed_issue_count: u32,
    active_issue_count: u32,
    overdue_issue_count: u32,
) -> UserMetric {
    UserMetric {
        username: username.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        completion_rate,
        completed_issue_count,
        active_issue_count,
        overdue_issue_count,
    }
}

pub fn sample_snapshot() -> DashboardSnapshot {
    DashboardSnapshot {
        stats: DashboardStats {
            total_issues: 1250,
            open_issues: 320,
            closed_issues: 930,
            overdue_issues: 45,
            avg_completion_time: 5.2,
            active_users: 28,
        },
        top_performers: vec![
            user("ahmet.yilmaz", "Ahmet", "Yılmaz", 95.2, 48, 3, 0),
            user("ayse.kaya", "Ayşe", "Kaya", 92.8, 42, 5, 0),
            user("mehmet.ozkan", "Mehmet", "Özkan", 89.5, 38, 4, 0),
            user("fatma.celik", "Fatma", "Çelik", 87.3, 35, 6, 0),
            user("ali.demir", "Ali", "Demir", 85.1, 32, 7, 0),
        ],
        overdue_users: vec![
            user("can.arslan", "Can", "Arslan", 0.0, 0, 12, 8),
            user("elif.yildirim", "Elif", "Yıldırım", 0.0, 0, 10, 6),
            user("burak.sahin", "Burak", "Şahin", 0.0, 0, 8, 5),
        ],
        most_active: vec![
            user("ahmet.yilmaz", "Ahmet", "Yılmaz", 95.2, 0, 15, 0),
            user("ayse.kaya", "Ayşe", "Kaya", 92.8, 0, 12, 0),
            user("mehmet.ozkan", "Mehmet", "Özkan", 89.5, 0, 10, 0),
        ],
    }
}
