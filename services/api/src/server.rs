use crate::cli::ServeArgs;
use crate::infra::{open_sheet_runtime, AppState};
use crate::routes::{with_batch_routes, BatchResources};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use calidad_pollito::config::AppConfig;
use calidad_pollito::dashboard::DashboardAggregator;
use calidad_pollito::error::AppError;
use calidad_pollito::scoring::ScoringConfig;
use calidad_pollito::stages::{SchemaSet, StageService};
use calidad_pollito::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (store, cache) = open_sheet_runtime(&config.storage)?;
    let service = Arc::new(StageService::new(
        store.clone(),
        cache.clone(),
        ScoringConfig::default(),
        SchemaSet::latest(),
    ));
    let resources = Arc::new(BatchResources {
        store: store.clone(),
        dashboard: DashboardAggregator::new(store, cache, SchemaSet::latest()),
        schemas: SchemaSet::latest(),
    });

    let app = with_batch_routes(service, resources)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        data_dir = %config.storage.data_dir.display(),
        "chick quality service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
