use crate::model::booking::{
    AvailabilityQuery, BookingErrorResponse, BookingResponse, BookingsResponse,
    ReserveBookingRequest,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kernel::model::booking::event::ReserveBooking;
use kernel::model::id::{BookingId, FacilityId};
use kernel::model::slot::TimeSlot;
use kernel::service::booking::{CancelError, ReserveError};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn reserve_facility(
    Path(facility_id): Path<FacilityId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<ReserveBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), Response> {
    let cmd = ReserveBooking::new(
        facility_id,
        req.member_id,
        req.coach_id,
        req.kind,
        req.start_time,
        req.end_time,
    );

    match registry.booking_service().reserve(cmd).await {
        Ok(booking) => Ok((StatusCode::CREATED, Json(booking.into()))),
        Err(err) => Err(reserve_rejection(err)),
    }
}

pub async fn cancel_booking(
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> Result<StatusCode, Response> {
    match registry.booking_service().cancel(booking_id).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => Err(cancel_rejection(err)),
    }
}

pub async fn show_booking(
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    registry
        .booking_repository()
        .find_by_id(booking_id)
        .await
        .and_then(|booking| match booking {
            Some(b) => Ok(Json(b.into())),
            None => Err(AppError::EntityNotFound(format!(
                "booking {booking_id} was not found"
            ))),
        })
}

pub async fn facility_availability(
    Path(facility_id): Path<FacilityId>,
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    let window = TimeSlot::new(query.from, query.to)
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    registry
        .booking_service()
        .availability(facility_id, window)
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

fn reserve_rejection(err: ReserveError) -> Response {
    let message = err.to_string();
    let (status, code) = match err {
        ReserveError::InvalidSlot { .. } => (StatusCode::BAD_REQUEST, "invalidTimeSlot"),
        ReserveError::FacilityUnavailable(_) => (StatusCode::NOT_FOUND, "facilityUnavailable"),
        ReserveError::SlotConflict { .. } => (StatusCode::CONFLICT, "slotConflict"),
        ReserveError::Infra(app) => return app.into_response(),
    };
    (status, Json(BookingErrorResponse { error: code, message })).into_response()
}

fn cancel_rejection(err: CancelError) -> Response {
    let message = err.to_string();
    let (status, code) = match err {
        CancelError::NotFound(_) => (StatusCode::NOT_FOUND, "notFound"),
        CancelError::AlreadyCancelled(_) => (StatusCode::CONFLICT, "alreadyCancelled"),
        CancelError::Infra(app) => return app.into_response(),
    };
    (status, Json(BookingErrorResponse { error: code, message })).into_response()
}
