use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use trial_insights::config::{AppConfig, DashboardConfig};
use trial_insights::dashboard::{DashboardService, ProfileId, ProfileStore};
use trial_insights::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dashboard: Arc<DashboardService>,
}

/// Builds a store from the environment for one-shot CLI commands, optionally
/// switching to `profile` first.
pub(crate) fn load_store(profile: Option<&str>) -> Result<ProfileStore, AppError> {
    let config = AppConfig::load()?;
    store_for(&config.dashboard, profile)
}

pub(crate) fn store_for(
    config: &DashboardConfig,
    profile: Option<&str>,
) -> Result<ProfileStore, AppError> {
    let mut store = ProfileStore::load(config)?;
    if let Some(profile) = profile {
        if !store.set_current_profile_id(ProfileId::new(profile)) {
            eprintln!("unknown profile '{profile}', showing {}", store.current_profile().id);
        }
    }
    Ok(store)
}
