use crate::model::facility::{
    CreateFacilityRequest, FacilitiesResponse, FacilityResponse, UpdateFacilityRequest,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::facility::event::UpdateFacility;
use kernel::model::id::FacilityId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_facility(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateFacilityRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    registry
        .facility_repository()
        .create(req.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn show_facility_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<FacilitiesResponse>> {
    registry
        .facility_repository()
        .find_all()
        .await
        .map(FacilitiesResponse::from)
        .map(Json)
}

pub async fn show_facility(
    Path(facility_id): Path<FacilityId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<FacilityResponse>> {
    registry
        .facility_repository()
        .find_by_id(facility_id)
        .await
        .and_then(|facility| match facility {
            Some(f) => Ok(Json(f.into())),
            None => Err(AppError::EntityNotFound(format!(
                "facility {facility_id} was not found"
            ))),
        })
}

pub async fn update_facility(
    Path(facility_id): Path<FacilityId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateFacilityRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    let update = UpdateFacility {
        facility_id,
        facility_name: req.facility_name,
        hourly_rate: req.hourly_rate,
        is_open: req.is_open,
        description: req.description,
        address: req.address,
    };
    registry
        .facility_repository()
        .update(update)
        .await
        .map(|_| StatusCode::OK)
}
