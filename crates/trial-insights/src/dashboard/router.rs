use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;

use super::demographics::{DemographicUpdate, PatientDemographic};
use super::domain::{placement, Category, Item, ProfileId};
use super::parameters::{trial_parameters, TrialParameters};
use super::service::{DashboardService, MoveReceipt};
use super::store::Profile;
use super::summary::NarrativeSummary;
use super::views::{CurrentProfileView, ProfileListView, RadarChartView};

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub item: Item,
    /// Required; `""` sends the item back to the available list.
    #[serde(with = "placement")]
    pub target_category: Option<Category>,
}

#[derive(Debug, Deserialize)]
pub struct SelectProfileRequest {
    pub profile_id: ProfileId,
}

/// HTTP surface over the profile store.
pub fn dashboard_router(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/v1/profiles", get(list_handler))
        .route(
            "/api/v1/profiles/current",
            get(current_handler).put(select_handler),
        )
        .route(
            "/api/v1/profiles/:profile_id/questions",
            get(questions_handler),
        )
        .route("/api/v1/profiles/:profile_id/radar", get(radar_handler))
        .route("/api/v1/profiles/:profile_id/moves", post(move_handler))
        .route("/api/v1/profiles/:profile_id/reset", post(reset_handler))
        .route(
            "/api/v1/profiles/:profile_id/demographics",
            patch(demographics_handler),
        )
        .route("/api/v1/profiles/:profile_id/summary", get(summary_handler))
        .route("/api/v1/trial-parameters", get(parameters_handler))
        .with_state(service)
}

pub(crate) async fn list_handler(
    State(service): State<Arc<DashboardService>>,
) -> Json<ProfileListView> {
    Json(service.profiles())
}

pub(crate) async fn current_handler(
    State(service): State<Arc<DashboardService>>,
) -> Json<CurrentProfileView> {
    Json(service.current_profile())
}

pub(crate) async fn select_handler(
    State(service): State<Arc<DashboardService>>,
    Json(request): Json<SelectProfileRequest>,
) -> Result<Json<CurrentProfileView>, AppError> {
    if !service.set_current_profile_id(request.profile_id.clone()) {
        return Err(AppError::ProfileNotFound(request.profile_id));
    }
    Ok(Json(service.current_profile()))
}

pub(crate) async fn questions_handler(
    State(service): State<Arc<DashboardService>>,
    Path(profile_id): Path<String>,
) -> Result<Json<Vec<Item>>, AppError> {
    let profile_id = ProfileId(profile_id);
    service
        .questions_for_profile(&profile_id)
        .map(Json)
        .ok_or(AppError::ProfileNotFound(profile_id))
}

pub(crate) async fn radar_handler(
    State(service): State<Arc<DashboardService>>,
    Path(profile_id): Path<String>,
) -> Result<Json<RadarChartView>, AppError> {
    let profile_id = ProfileId(profile_id);
    service
        .radar(&profile_id)
        .map(Json)
        .ok_or(AppError::ProfileNotFound(profile_id))
}

pub(crate) async fn move_handler(
    State(service): State<Arc<DashboardService>>,
    Path(profile_id): Path<String>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveReceipt>, AppError> {
    let profile_id = ProfileId(profile_id);
    let receipt = service.move_item(&profile_id, &request.item, request.target_category);
    if receipt.radar.is_none() {
        return Err(AppError::ProfileNotFound(profile_id));
    }
    Ok(Json(receipt))
}

pub(crate) async fn reset_handler(
    State(service): State<Arc<DashboardService>>,
    Path(profile_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let profile_id = ProfileId(profile_id);
    service
        .reset_profile(&profile_id)
        .map(Json)
        .ok_or(AppError::ProfileNotFound(profile_id))
}

pub(crate) async fn demographics_handler(
    State(service): State<Arc<DashboardService>>,
    Path(profile_id): Path<String>,
    Json(update): Json<DemographicUpdate>,
) -> Result<Json<PatientDemographic>, AppError> {
    let profile_id = ProfileId(profile_id);
    service
        .update_patient_demographic(&profile_id, update)
        .map(Json)
        .ok_or(AppError::ProfileNotFound(profile_id))
}

pub(crate) async fn summary_handler(
    State(service): State<Arc<DashboardService>>,
    Path(profile_id): Path<String>,
) -> Result<Json<NarrativeSummary>, AppError> {
    let profile_id = ProfileId(profile_id);
    service
        .summary(&profile_id)
        .map(Json)
        .ok_or(AppError::ProfileNotFound(profile_id))
}

pub(crate) async fn parameters_handler() -> Json<TrialParameters> {
    Json(trial_parameters())
}
