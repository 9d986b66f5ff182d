use crate::model::facility::event::{CreateFacility, UpdateFacility};
use crate::model::facility::Facility;
use crate::model::id::FacilityId;
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait FacilityRepository: Send + Sync {
    async fn create(&self, event: CreateFacility) -> AppResult<()>;
    async fn find_all(&self) -> AppResult<Vec<Facility>>;
    async fn find_by_id(&self, facility_id: FacilityId) -> AppResult<Option<Facility>>;
    async fn update(&self, event: UpdateFacility) -> AppResult<()>;
}
