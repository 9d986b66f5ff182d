use chrono::{DateTime, Utc};
use kernel::fee::FeeBreakdown;
use kernel::model::booking::{Booking, BookingKind, BookingStatus};
use kernel::model::id::{BookingId, CoachId, FacilityId, MemberId};
use kernel::model::slot::TimeSlot;
use rust_decimal::Decimal;
use shared::error::AppError;

/// One row of the bookings table. Kind and status are stored as text and
/// parsed on the way out, so a corrupted row surfaces as a conversion
/// error instead of a panic.
#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub facility_id: FacilityId,
    pub member_id: MemberId,
    pub coach_id: Option<CoachId>,
    pub kind: String,
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub facility_fee: Decimal,
    pub coach_fee: Decimal,
    pub total_fee: Decimal,
    pub reserved_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let BookingRow {
            booking_id,
            facility_id,
            member_id,
            coach_id,
            kind,
            status,
            start_time,
            end_time,
            facility_fee,
            coach_fee,
            total_fee,
            reserved_at,
        } = value;
        let slot = TimeSlot::new(start_time, end_time)
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))?;
        Ok(Booking {
            booking_id,
            facility_id,
            member_id,
            coach_id,
            kind: BookingKind::try_from(kind.as_str())?,
            status: BookingStatus::try_from(status.as_str())?,
            slot,
            fees: FeeBreakdown {
                facility_fee,
                coach_fee,
                total: total_fee,
            },
            reserved_at,
        })
    }
}
