use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{
    EggReceptionSubmission, FarmReceptionSubmission, HatcherySubmission, SevenDaySubmission,
    TransportSubmission,
};
use super::service::{StageOutcome, StageService, StageServiceError};
use crate::store::{SheetStore, StoreError};

/// Router builder exposing one submission endpoint per lifecycle stage plus
/// the seeded sample-grid defaults.
pub fn stage_router<S: SheetStore + 'static>(service: Arc<StageService<S>>) -> Router {
    Router::new()
        .route(
            "/api/v1/stages/egg-reception",
            post(egg_reception_handler::<S>),
        )
        .route("/api/v1/stages/hatchery", post(hatchery_handler::<S>))
        .route("/api/v1/stages/transport", post(transport_handler::<S>))
        .route(
            "/api/v1/stages/farm-reception",
            post(farm_reception_handler::<S>),
        )
        .route("/api/v1/stages/seven-day", post(seven_day_handler::<S>))
        .route("/api/v1/sample-grid", get(sample_grid_handler::<S>))
        .with_state(service)
}

fn submission_response(result: Result<StageOutcome, StageServiceError>) -> Response {
    match result {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(err @ StageServiceError::Validation { .. }) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(err @ StageServiceError::BatchNotFound(_)) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(StageServiceError::Store(StoreError::Unavailable(detail))) => {
            let payload = json!({ "error": format!("sheet store unavailable: {detail}") });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn egg_reception_handler<S: SheetStore>(
    State(service): State<Arc<StageService<S>>>,
    axum::Json(submission): axum::Json<EggReceptionSubmission>,
) -> Response {
    submission_response(service.submit_egg_reception(submission))
}

pub(crate) async fn hatchery_handler<S: SheetStore>(
    State(service): State<Arc<StageService<S>>>,
    axum::Json(submission): axum::Json<HatcherySubmission>,
) -> Response {
    submission_response(service.submit_hatchery(submission))
}

pub(crate) async fn transport_handler<S: SheetStore>(
    State(service): State<Arc<StageService<S>>>,
    axum::Json(submission): axum::Json<TransportSubmission>,
) -> Response {
    submission_response(service.submit_transport(submission))
}

pub(crate) async fn farm_reception_handler<S: SheetStore>(
    State(service): State<Arc<StageService<S>>>,
    axum::Json(submission): axum::Json<FarmReceptionSubmission>,
) -> Response {
    submission_response(service.submit_farm_reception(submission))
}

pub(crate) async fn seven_day_handler<S: SheetStore>(
    State(service): State<Arc<StageService<S>>>,
    axum::Json(submission): axum::Json<SevenDaySubmission>,
) -> Response {
    submission_response(service.submit_seven_day(submission))
}

pub(crate) async fn sample_grid_handler<S: SheetStore>(
    State(service): State<Arc<StageService<S>>>,
) -> Response {
    let grid = service.default_grid();
    (StatusCode::OK, axum::Json(grid)).into_response()
}
