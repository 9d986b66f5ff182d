use kernel::model::facility::Facility;
use kernel::model::id::FacilityId;
use rust_decimal::Decimal;

#[derive(sqlx::FromRow)]
pub struct FacilityRow {
    pub facility_id: FacilityId,
    pub facility_name: String,
    pub hourly_rate: Decimal,
    pub is_open: bool,
    pub description: String,
    pub address: String,
}

impl From<FacilityRow> for Facility {
    fn from(value: FacilityRow) -> Self {
        let FacilityRow {
            facility_id,
            facility_name,
            hourly_rate,
            is_open,
            description,
            address,
        } = value;
        Facility {
            facility_id,
            facility_name,
            hourly_rate,
            is_open,
            description,
            address,
        }
    }
}
