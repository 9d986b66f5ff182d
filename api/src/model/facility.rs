use garde::Validate;
use kernel::model::facility::{event::CreateFacility, Facility};
use kernel::model::id::FacilityId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityRequest {
    #[garde(length(min = 1))]
    pub facility_name: String,
    #[garde(custom(non_negative_rate))]
    pub hourly_rate: Decimal,
    #[garde(skip)]
    pub is_open: bool,
    #[garde(skip)]
    pub description: String,
    #[garde(skip)]
    pub address: String,
}

impl From<CreateFacilityRequest> for CreateFacility {
    fn from(value: CreateFacilityRequest) -> Self {
        let CreateFacilityRequest {
            facility_name,
            hourly_rate,
            is_open,
            description,
            address,
        } = value;
        CreateFacility {
            facility_name,
            hourly_rate,
            is_open,
            description,
            address,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFacilityRequest {
    #[garde(inner(length(min = 1)))]
    pub facility_name: Option<String>,
    #[garde(inner(custom(non_negative_rate)))]
    pub hourly_rate: Option<Decimal>,
    #[garde(skip)]
    pub is_open: Option<bool>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub address: Option<String>,
}

fn non_negative_rate(value: &Decimal, _ctx: &()) -> garde::Result {
    if value.is_sign_negative() {
        return Err(garde::Error::new("hourly rate must not be negative"));
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilitiesResponse {
    pub items: Vec<FacilityResponse>,
}

impl From<Vec<Facility>> for FacilitiesResponse {
    fn from(value: Vec<Facility>) -> Self {
        Self {
            items: value.into_iter().map(FacilityResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityResponse {
    pub facility_id: FacilityId,
    pub facility_name: String,
    pub hourly_rate: Decimal,
    pub is_open: bool,
    pub description: String,
    pub address: String,
}

impl From<Facility> for FacilityResponse {
    fn from(value: Facility) -> Self {
        let Facility {
            facility_id,
            facility_name,
            hourly_rate,
            is_open,
            description,
            address,
        } = value;
        Self {
            facility_id,
            facility_name,
            hourly_rate,
            is_open,
            description,
            address,
        }
    }
}
