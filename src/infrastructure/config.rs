use config::ConfigBuilder;
use config::builder::DefaultState;
use crate::application::dashboard_service::RefreshSettings;
use crate::application::refresh_scheduler::DEFAULT_REFRESH_INTERVAL;
use crate::domain::fetch_state::FallbackPolicy;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub api: ApiSettings,
    pub refresh: RefreshConfig,
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub top_performers_limit: usize,
    pub most_active_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    pub interval_secs: u64,
    pub fallback: FallbackPolicy,
    pub single_flight: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    /// Rows shown per user table
    pub rows: usize,
}

impl DashboardConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_secs)
    }

    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            top_performers_limit: self.api.top_performers_limit,
            most_active_limit: self.api.most_active_limit,
            fallback: self.refresh.fallback,
            single_flight: self.refresh.single_flight,
        }
    }
}

/// Load `config/dashboard.*` (optional) overlaid with `DASHBOARD__SECTION__KEY`
/// environment variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        );

    build_config(builder)
}

fn build_config(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<DashboardConfig> {
    let settings = builder
        .set_default("server.bind", "0.0.0.0:3000")?
        .set_default("api.base_url", "http://localhost:8080/api")?
        .set_default("api.request_timeout_secs", 10_i64)?
        .set_default("api.top_performers_limit", 10_i64)?
        .set_default("api.most_active_limit", 10_i64)?
        .set_default(
            "refresh.interval_secs",
            DEFAULT_REFRESH_INTERVAL.as_secs() as i64,
        )?
        .set_default("refresh.fallback", "clear")?
        .set_default("refresh.single_flight", false)?
        .set_default("display.rows", 5_i64)?
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    if config.refresh.interval_secs == 0 {
        anyhow::bail!("refresh.interval_secs must be greater than zero");
    }
    if config.api.request_timeout_secs == 0 {
        anyhow::bail!("api.request_timeout_secs must be greater than zero");
    }

    Ok(config)
}
