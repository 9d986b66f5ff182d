use crate::model::booking::event::NewBooking;
use crate::model::booking::{Booking, BookingStatus};
use crate::model::id::{BookingId, FacilityId};
use crate::model::slot::TimeSlot;
use async_trait::async_trait;
use shared::error::AppResult;

/// What `create` decided at commit time. `Conflict` covers the race where
/// another confirmed booking won the slot between the service's check and
/// the insert; the store must detect it atomically.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(Booking),
    Conflict,
}

/// Whether a guarded status update changed the row. `Unchanged` means a
/// concurrent caller (or a prior call) already applied the same status.
#[derive(Debug, PartialEq, Eq)]
pub enum StatusUpdate {
    Applied,
    Unchanged,
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a priced booking, assigning its id. The conflict check and
    /// the insert must act as one unit per facility.
    async fn create(&self, event: NewBooking) -> AppResult<CreateOutcome>;
    /// Set the status only if the row does not already carry it.
    async fn update_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> AppResult<StatusUpdate>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    /// Every booking (any status) intersecting the window, ordered by slot
    /// start ascending. Used for availability views, not conflict checks.
    async fn find_overlapping(
        &self,
        facility_id: FacilityId,
        slot: &TimeSlot,
    ) -> AppResult<Vec<Booking>>;
    /// Fast existence probe over confirmed bookings only.
    async fn exists_confirmed_overlap(
        &self,
        facility_id: FacilityId,
        slot: &TimeSlot,
    ) -> AppResult<bool>;
}
