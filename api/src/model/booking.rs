use chrono::{DateTime, Utc};
use kernel::model::booking::{Booking, BookingKind, BookingStatus};
use kernel::model::id::{BookingId, CoachId, FacilityId, MemberId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of a booking request. The member id travels in the body because
/// authentication is handled by a collaborator in front of this service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveBookingRequest {
    pub member_id: MemberId,
    pub coach_id: Option<CoachId>,
    pub kind: BookingKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub facility_id: FacilityId,
    pub member_id: MemberId,
    pub coach_id: Option<CoachId>,
    pub kind: BookingKind,
    pub status: BookingStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: f64,
    pub facility_fee: Decimal,
    pub coach_fee: Decimal,
    pub total_fee: Decimal,
    pub reserved_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            facility_id,
            member_id,
            coach_id,
            kind,
            status,
            slot,
            fees,
            reserved_at,
        } = value;
        Self {
            booking_id,
            facility_id,
            member_id,
            coach_id,
            kind,
            status,
            start_time: slot.start(),
            end_time: slot.end(),
            duration_hours: slot.duration_hours(),
            facility_fee: fees.facility_fee,
            coach_fee: fees.coach_fee,
            total_fee: fees.total,
            reserved_at,
        }
    }
}

/// Body attached to a rejected booking operation. `error` is a stable
/// machine-readable tag; `message` repeats the ids and window so the
/// caller can render something actionable.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingErrorResponse {
    pub error: &'static str,
    pub message: String,
}
