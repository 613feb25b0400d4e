// Refresh scheduler - Periodic and manual dashboard refreshes
use crate::application::dashboard_service::DashboardService;
use crate::domain::fetch_state::RefreshTrigger;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(20 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerPhase {
    Idle,
    Fetching,
}

struct ActiveSchedule {
    token: CancellationToken,
    timer: JoinHandle<()>,
}

pub struct RefreshScheduler {
    service: DashboardService,
    interval: Duration,
    schedule: Mutex<Option<ActiveSchedule>>,
}

impl RefreshScheduler {
    pub fn new(service: DashboardService, interval: Duration) -> Self {
        Self {
            service,
            interval,
            schedule: Mutex::new(None),
        }
    }

    pub fn service(&self) -> &DashboardService {
        &self.service
    }

    /// Phase follows the fetcher; the scheduler does not track outcomes.
    pub fn phase(&self) -> SchedulerPhase {
        if self.service.is_fetching() {
            SchedulerPhase::Fetching
        } else {
            SchedulerPhase::Idle
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.lock_schedule().is_some()
    }

    /// Fetch immediately and then every `interval` until deactivated.
    /// Returns false if the scheduler was already active.
    pub fn activate(&self) -> bool {
        let mut schedule = self.lock_schedule();
        if schedule.is_some() {
            return false;
        }

        let token = CancellationToken::new();
        let timer = tokio::spawn(run_timer(
            self.service.clone(),
            self.interval,
            token.clone(),
        ));
        *schedule = Some(ActiveSchedule { token, timer });

        tracing::info!(interval_secs = self.interval.as_secs(), "Refresh scheduler activated");
        true
    }

    /// Refresh now without touching the timer. Returns false when inactive.
    pub fn trigger_manual(&self) -> bool {
        let token = match self.lock_schedule().as_ref() {
            Some(active) => active.token.clone(),
            None => return false,
        };

        let service = self.service.clone();
        tokio::spawn(async move {
            service
                .refresh(RefreshTrigger::Manual, &token)
                .await;
        });
        true
    }

    /// Stop the timer. Refreshes still in flight finish without updating state.
    pub async fn deactivate(&self) {
        let Some(active) = self.lock_schedule().take() else {
            return;
        };

        active.token.cancel();
        if let Err(e) = active.timer.await {
            tracing::error!(error = %e, "Refresh timer task failed");
        }
        tracing::info!("Refresh scheduler deactivated");
    }

    fn lock_schedule(&self) -> MutexGuard<'_, Option<ActiveSchedule>> {
        self.schedule
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn run_timer(service: DashboardService, period: Duration, token: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            // The first tick completes immediately, giving the fetch on activation
            _ = ticker.tick() => {
                let service = service.clone();
                let token = token.clone();
                tokio::spawn(async move {
                    service
                        .refresh(RefreshTrigger::Automatic, &token)
                        .await;
                });
            }
        }
    }
}
