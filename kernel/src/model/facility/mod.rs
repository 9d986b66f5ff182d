use crate::model::id::FacilityId;
use rust_decimal::Decimal;

pub mod event;

/// A bookable facility (court, pool, studio) and its pricing. `is_open`
/// gates new bookings; closing a facility leaves existing bookings alone.
#[derive(Debug, Clone)]
pub struct Facility {
    pub facility_id: FacilityId,
    pub facility_name: String,
    pub hourly_rate: Decimal,
    pub is_open: bool,
    pub description: String,
    pub address: String,
}
