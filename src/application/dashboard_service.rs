// Dashboard service - Fetches the four dashboard payloads and updates view state
use chrono::Utc;
use crate::application::dashboard_repository::{DashboardRepository, FetchError};
use crate::domain::fetch_state::{CycleOutcome, FallbackPolicy, FetchState, RefreshTrigger};
use crate::domain::metrics::DashboardSnapshot;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub top_performers_limit: usize,
    pub most_active_limit: usize,
    pub fallback: FallbackPolicy,
    /// Skip a refresh when another one is still running
    pub single_flight: bool,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            top_performers_limit: 10,
            most_active_limit: 10,
            fallback: FallbackPolicy::Clear,
            single_flight: false,
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn DashboardRepository>,
    settings: RefreshSettings,
    state: Arc<RwLock<FetchState>>,
}

/// Ends the loading phase of a cycle however the cycle exits.
struct LoadingGuard {
    state: Arc<RwLock<FetchState>>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        write_lock(&self.state).finish_refresh();
    }
}

fn write_lock(state: &RwLock<FetchState>) -> RwLockWriteGuard<'_, FetchState> {
    state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DashboardService {
    pub fn new(repository: Arc<dyn DashboardRepository>, settings: RefreshSettings) -> Self {
        Self {
            repository,
            settings,
            state: Arc::new(RwLock::new(FetchState::new(Utc::now()))),
        }
    }

    /// Copy of the current view state
    pub fn state(&self) -> FetchState {
        self.read_state().clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.read_state().loading
    }

    /// Run one refresh cycle. Failures are recorded in the state, never returned.
    /// The result is dropped if `active` is cancelled before the cycle completes.
    pub async fn refresh(&self, trigger: RefreshTrigger, active: &CancellationToken) {
        if active.is_cancelled() {
            return;
        }

        let was_idle = write_lock(&self.state).begin_refresh();
        let _loading = LoadingGuard {
            state: self.state.clone(),
        };

        if !was_idle && self.settings.single_flight {
            tracing::debug!(%trigger, "Refresh already in flight, skipping");
            return;
        }

        tracing::debug!(%trigger, "Starting dashboard refresh");
        let outcome = match self.fetch_snapshot().await {
            Ok(snapshot) => {
                tracing::info!(
                    %trigger,
                    top_performers = snapshot.top_performers.len(),
                    overdue_users = snapshot.overdue_users.len(),
                    most_active = snapshot.most_active.len(),
                    "Dashboard refreshed"
                );
                CycleOutcome::Success(snapshot)
            }
            Err(e) => {
                tracing::warn!(%trigger, error = %e, "Dashboard refresh failed");
                CycleOutcome::Failure(e.to_string())
            }
        };

        // Checked under the write lock so a concurrent deactivate cannot slip in
        let mut state = write_lock(&self.state);
        if active.is_cancelled() {
            tracing::debug!(%trigger, "Dashboard deactivated, discarding refresh result");
            return;
        }
        state.apply(outcome, self.settings.fallback, Utc::now());
    }

    async fn fetch_snapshot(&self) -> Result<DashboardSnapshot, FetchError> {
        let repo = &self.repository;
        let (stats, top_performers, overdue_users, most_active) = futures::try_join!(
            repo.fetch_stats(),
            repo.fetch_top_performers(self.settings.top_performers_limit),
            repo.fetch_overdue_users(),
            repo.fetch_most_active(self.settings.most_active_limit),
        )?;

        Ok(DashboardSnapshot {
            stats,
            top_performers,
            overdue_users,
            most_active,
        })
    }

    fn read_state(&self) -> RwLockReadGuard<'_, FetchState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use crate::application::test_support::{StubRepository, user};
    use crate::domain::sample::sample_snapshot;
    use std::time::Duration;
    use super::*;

    fn service(repo: Arc<StubRepository>, settings: RefreshSettings) -> DashboardService {
        DashboardService::new(repo, settings)
    }

    #[tokio::test]
    async fn test_successful_cycle_adopts_all_payloads() {
        let repo = Arc::new(StubRepository::healthy());
        let service = service(repo.clone(), RefreshSettings::default());
        let active = CancellationToken::new();

        service.refresh(RefreshTrigger::Manual, &active).await;

        let state = service.state();
        assert_eq!(state.error, None);
        assert!(!state.loading);
        assert_eq!(state.stats.as_ref().map(|s| s.open_issues), Some(320));
        assert_eq!(state.top_performers[0].username, "ahmet.yilmaz");
        assert_eq!(state.overdue_users.len(), 1);
        assert_eq!(state.most_active.len(), 1);
        assert_eq!(repo.last_limits(), (10, 10));
    }

    #[tokio::test]
    async fn test_single_failing_endpoint_fails_whole_cycle() {
        let repo = Arc::new(StubRepository::healthy());
        let service = service(repo.clone(), RefreshSettings::default());
        let active = CancellationToken::new();
        service.refresh(RefreshTrigger::Automatic, &active).await;

        *repo.overdue_users.lock().unwrap() = Err(FetchError::HttpStatus {
            endpoint: "overdue-issues",
            status: 503,
        });
        service.refresh(RefreshTrigger::Automatic, &active).await;

        let state = service.state();
        assert_eq!(
            state.error.as_deref(),
            Some("overdue-issues responded with status 503")
        );
        assert!(!state.loading);
        assert!(state.stats.is_none());
        assert!(state.top_performers.is_empty());
        assert!(state.overdue_users.is_empty());
        assert!(state.most_active.is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_applies_sample_fallback_to_every_field() {
        let repo = Arc::new(StubRepository::healthy());
        *repo.stats.lock().unwrap() = Err(FetchError::Network {
            endpoint: "stats",
            message: "connection refused".to_string(),
        });
        let settings = RefreshSettings {
            fallback: FallbackPolicy::Sample,
            ..RefreshSettings::default()
        };
        let service = service(repo, settings);
        let active = CancellationToken::new();

        service.refresh(RefreshTrigger::Manual, &active).await;

        let state = service.state();
        let sample = sample_snapshot();
        assert!(state.error.as_deref().is_some_and(|e| !e.is_empty()));
        assert!(!state.loading);
        assert_eq!(state.stats, Some(sample.stats));
        assert_eq!(state.top_performers, sample.top_performers);
        assert_eq!(state.overdue_users, sample.overdue_users);
        assert_eq!(state.most_active, sample.most_active);
    }

    #[tokio::test]
    async fn test_repeated_refresh_is_idempotent() {
        let repo = Arc::new(StubRepository::healthy());
        let service = service(repo, RefreshSettings::default());
        let active = CancellationToken::new();

        service.refresh(RefreshTrigger::Manual, &active).await;
        let mut first = service.state();
        service.refresh(RefreshTrigger::Manual, &active).await;
        let second = service.state();

        first.last_updated = second.last_updated;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_server_order_is_kept() {
        let repo = Arc::new(StubRepository::healthy());
        *repo.top_performers.lock().unwrap() = Ok(vec![
            user("b", 70.0, 1, 0),
            user("a", 99.0, 1, 0),
            user("c", 80.0, 1, 0),
        ]);
        let service = service(repo, RefreshSettings::default());
        let active = CancellationToken::new();

        service.refresh(RefreshTrigger::Manual, &active).await;

        let names: Vec<_> = service
            .state()
            .top_performers
            .iter()
            .map(|u| u.username.clone())
            .collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_is_set_while_in_flight() {
        let repo = Arc::new(StubRepository::healthy().with_delay(Duration::from_secs(2)));
        let service = service(repo, RefreshSettings::default());
        let active = CancellationToken::new();

        let background = service.clone();
        let handle = tokio::spawn(async move {
            background.refresh(RefreshTrigger::Manual, &active).await
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(service.is_fetching());

        handle.await.unwrap();
        assert!(!service.is_fetching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_refreshes_both_run_by_default() {
        let repo = Arc::new(StubRepository::healthy().with_delay(Duration::from_secs(1)));
        let service = service(repo.clone(), RefreshSettings::default());
        let active = CancellationToken::new();

        tokio::join!(
            service.refresh(RefreshTrigger::Automatic, &active),
            service.refresh(RefreshTrigger::Manual, &active)
        );

        assert_eq!(repo.cycles(), 2);
        assert!(!service.is_fetching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_flight_skips_overlapping_refresh() {
        let repo = Arc::new(StubRepository::healthy().with_delay(Duration::from_secs(1)));
        let settings = RefreshSettings {
            single_flight: true,
            ..RefreshSettings::default()
        };
        let service = service(repo.clone(), settings);
        let active = CancellationToken::new();

        tokio::join!(
            service.refresh(RefreshTrigger::Automatic, &active),
            service.refresh(RefreshTrigger::Manual, &active)
        );

        assert_eq!(repo.cycles(), 1);
        assert!(!service.is_fetching());
        assert!(service.state().stats.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_is_discarded_after_deactivation() {
        let repo = Arc::new(StubRepository::healthy().with_delay(Duration::from_secs(5)));
        let service = service(repo, RefreshSettings::default());
        let active = CancellationToken::new();

        let background = service.clone();
        let token = active.clone();
        let handle = tokio::spawn(async move {
            background
                .refresh(RefreshTrigger::Automatic, &token)
                .await
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        active.cancel();
        handle.await.unwrap();

        let state = service.state();
        assert!(state.stats.is_none());
        assert!(!state.loading);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_deactivation_while_waiting_for_state_lock_discards_result() {
        let repo = Arc::new(StubRepository::healthy().with_delay(Duration::from_millis(200)));
        let service = service(repo, RefreshSettings::default());
        let active = CancellationToken::new();

        let background = service.clone();
        let token = active.clone();
        let handle = tokio::spawn(async move {
            background
                .refresh(RefreshTrigger::Automatic, &token)
                .await
        });

        // Hold the state lock across the end of the fetch, then deactivate
        tokio::time::sleep(Duration::from_millis(50)).await;
        let held = write_lock(&service.state);
        std::thread::sleep(Duration::from_millis(400));
        active.cancel();
        drop(held);
        handle.await.unwrap();

        let state = service.state();
        assert!(state.stats.is_none());
        assert!(state.error.is_none());
        assert!(!state.loading);
    }
}
