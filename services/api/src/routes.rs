use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use calidad_pollito::dashboard::{BatchDashboard, DashboardAggregator};
use calidad_pollito::error::AppError;
use calidad_pollito::export::export_batch;
use calidad_pollito::stages::{stage_router, SchemaSet, StageService};
use calidad_pollito::store::SheetStore;
use serde_json::json;
use std::sync::Arc;

/// Read-side resources shared by the dashboard and export endpoints.
pub(crate) struct BatchResources<S> {
    pub(crate) store: Arc<S>,
    pub(crate) dashboard: DashboardAggregator<S>,
    pub(crate) schemas: SchemaSet,
}

pub(crate) fn with_batch_routes<S: SheetStore + 'static>(
    service: Arc<StageService<S>>,
    resources: Arc<BatchResources<S>>,
) -> axum::Router {
    let read_routes = axum::Router::new()
        .route(
            "/api/v1/batches",
            axum::routing::get(list_batches_endpoint::<S>),
        )
        .route(
            "/api/v1/batches/:batch_id/dashboard",
            axum::routing::get(batch_dashboard_endpoint::<S>),
        )
        .route(
            "/api/v1/batches/:batch_id/export",
            axum::routing::get(batch_export_endpoint::<S>),
        )
        .route(
            "/api/v1/cache/refresh",
            axum::routing::post(refresh_cache_endpoint::<S>),
        )
        .with_state(resources);

    stage_router(service)
        .merge(read_routes)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn list_batches_endpoint<S: SheetStore>(
    State(resources): State<Arc<BatchResources<S>>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let batches = resources.dashboard.known_batches()?;
    Ok(Json(json!({ "batches": batches })))
}

pub(crate) async fn batch_dashboard_endpoint<S: SheetStore>(
    State(resources): State<Arc<BatchResources<S>>>,
    Path(batch_id): Path<String>,
) -> Result<Json<BatchDashboard>, AppError> {
    let view = resources.dashboard.batch_dashboard(&batch_id)?;
    Ok(Json(view))
}

pub(crate) async fn batch_export_endpoint<S: SheetStore>(
    State(resources): State<Arc<BatchResources<S>>>,
    Path(batch_id): Path<String>,
) -> Result<([(header::HeaderName, String); 2], String), AppError> {
    let dump = export_batch(resources.store.as_ref(), &resources.schemas, &batch_id)?;
    let disposition = format!("attachment; filename=\"{}.csv\"", batch_id.trim());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        dump,
    ))
}

pub(crate) async fn refresh_cache_endpoint<S: SheetStore>(
    State(resources): State<Arc<BatchResources<S>>>,
) -> Json<serde_json::Value> {
    resources.dashboard.refresh();
    Json(json!({ "status": "refreshed" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calidad_pollito::scoring::ScoringConfig;
    use calidad_pollito::stages::{
        BatchId, CheckKind, GeneticLine, HatcherySubmission, SampleGrid, SampleRecord,
    };
    use calidad_pollito::store::{CsvSheetStore, TableCache};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn passing_samples(count: usize, weight_g: f64) -> Vec<SampleRecord> {
        let mut grid = SampleGrid::seeded(count);
        for record in grid.records_mut() {
            record.weight_g = weight_g;
            for kind in CheckKind::ordered() {
                record.checks.insert(kind, true);
            }
        }
        grid.snapshot()
    }

    fn hatchery_submission(batch: &str) -> HatcherySubmission {
        HatcherySubmission {
            batch_id: BatchId(batch.to_string()),
            origin_farm: "Reproductora Norte".to_string(),
            genetic_line: GeneticLine::Cobb,
            birth_date: NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date"),
            total_count: 1000,
            evaluator: "M. Rodriguez".to_string(),
            truck_temp_c: 22.0,
            shell_temp_c: 18.0,
            room_temp_c: 21.0,
            egg_sweating: false,
            birds_per_box: 100,
            samples: passing_samples(10, 40.0),
        }
    }

    fn rig(
        dir: &std::path::Path,
    ) -> (
        Arc<StageService<CsvSheetStore>>,
        Arc<BatchResources<CsvSheetStore>>,
    ) {
        let store =
            Arc::new(CsvSheetStore::open(dir, SchemaSet::latest()).expect("store opens"));
        let cache = Arc::new(TableCache::new(Duration::from_secs(600)));
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
        (service, resources)
    }

    #[tokio::test]
    async fn dashboard_endpoint_renders_a_submitted_batch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (service, resources) = rig(dir.path());
        service
            .submit_hatchery(hatchery_submission("L-100"))
            .expect("submission succeeds");

        let Json(view) =
            batch_dashboard_endpoint(State(resources.clone()), Path("L-100".to_string()))
                .await
                .expect("dashboard renders");

        let snapshot = view.hatchery.expect("hatchery snapshot present");
        assert!((snapshot.composite_score - 109.5).abs() < 1e-9);
        assert!(view.farm_reception.is_none());

        let Json(listing) = list_batches_endpoint(State(resources))
            .await
            .expect("listing works");
        assert_eq!(listing["batches"][0], "L-100");
    }

    #[tokio::test]
    async fn export_endpoint_returns_a_csv_attachment() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (service, resources) = rig(dir.path());
        service
            .submit_hatchery(hatchery_submission("L-200"))
            .expect("submission succeeds");

        let (headers, body) = batch_export_endpoint(State(resources), Path("L-200".to_string()))
            .await
            .expect("export succeeds");

        assert_eq!(headers[0].1, "text/csv; charset=utf-8");
        assert!(headers[1].1.contains("L-200.csv"));
        assert!(body.contains("--- Lotes_Resumen ---"));
        assert!(body.contains("L-200"));
    }
}
