use crate::model::id::FacilityId;
use rust_decimal::Decimal;

pub struct CreateFacility {
    pub facility_name: String,
    pub hourly_rate: Decimal,
    pub is_open: bool,
    pub description: String,
    pub address: String,
}

#[derive(Debug)]
pub struct UpdateFacility {
    pub facility_id: FacilityId,
    pub facility_name: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub is_open: Option<bool>,
    pub description: Option<String>,
    pub address: Option<String>,
}
