use crate::cli::ServeArgs;
use crate::infra::{store_for, AppState};
use crate::routes::with_dashboard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use trial_insights::config::AppConfig;
use trial_insights::dashboard::DashboardService;
use trial_insights::error::AppError;
use trial_insights::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let store = store_for(&config.dashboard, None)?;
    let dashboard = Arc::new(DashboardService::new(store));
    let loading = dashboard.clone();
    let phase_duration = config.dashboard.loading_phase;
    tokio::spawn(async move {
        loading.run_loading_sequence(phase_duration).await;
    });

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        dashboard: dashboard.clone(),
    };

    let app = with_dashboard_routes(dashboard)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "trial insights dashboard listening");

    axum::serve(listener, app).await?;
    Ok(())
}
