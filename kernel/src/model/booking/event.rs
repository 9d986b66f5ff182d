use crate::fee::FeeBreakdown;
use crate::model::booking::BookingKind;
use crate::model::id::{CoachId, FacilityId, MemberId};
use crate::model::slot::TimeSlot;
use chrono::{DateTime, Utc};
use derive_new::new;

/// A member's request to book a facility. Start and end arrive unchecked;
/// the scheduling service turns them into a validated slot.
#[derive(Debug, new)]
pub struct ReserveBooking {
    pub facility_id: FacilityId,
    pub member_id: MemberId,
    pub coach_id: Option<CoachId>,
    pub kind: BookingKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// A fully priced booking ready to be persisted. The repository assigns the
/// id and writes the record with confirmed status.
#[derive(Debug, new)]
pub struct NewBooking {
    pub facility_id: FacilityId,
    pub member_id: MemberId,
    pub coach_id: Option<CoachId>,
    pub kind: BookingKind,
    pub slot: TimeSlot,
    pub fees: FeeBreakdown,
    pub reserved_at: DateTime<Utc>,
}
