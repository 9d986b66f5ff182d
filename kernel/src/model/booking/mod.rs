use crate::fee::FeeBreakdown;
use crate::model::id::{BookingId, CoachId, FacilityId, MemberId};
use crate::model::slot::TimeSlot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

pub mod event;

/// A confirmed or cancelled claim on a facility for a time slot. Built only
/// by the scheduling service; the fee fields are fixed at creation and are
/// not touched again, even when catalog rates change afterwards.
#[derive(Debug, Clone)]
pub struct Booking {
    pub booking_id: BookingId,
    pub facility_id: FacilityId,
    pub member_id: MemberId,
    pub coach_id: Option<CoachId>,
    pub kind: BookingKind,
    pub status: BookingStatus,
    pub slot: TimeSlot,
    pub fees: FeeBreakdown,
    pub reserved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingKind {
    FacilityOnly,
    Training,
}

impl BookingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingKind::FacilityOnly => "facility_only",
            BookingKind::Training => "training",
        }
    }
}

impl TryFrom<&str> for BookingKind {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "facility_only" => Ok(BookingKind::FacilityOnly),
            "training" => Ok(BookingKind::Training),
            other => Err(AppError::ConversionEntityError(format!(
                "unknown booking kind: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for BookingStatus {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(AppError::ConversionEntityError(format!(
                "unknown booking status: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_status_round_trip_their_storage_form() {
        assert_eq!(
            BookingKind::try_from(BookingKind::Training.as_str()).unwrap(),
            BookingKind::Training
        );
        assert_eq!(
            BookingStatus::try_from(BookingStatus::Cancelled.as_str()).unwrap(),
            BookingStatus::Cancelled
        );
        assert!(BookingKind::try_from("swimming").is_err());
        assert!(BookingStatus::try_from("pending").is_err());
    }
}
