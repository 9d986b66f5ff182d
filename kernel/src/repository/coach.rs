use crate::model::id::CoachId;
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::error::AppResult;

/// Read-only lookup into the coach roster, which is administered outside
/// this service. `None` means the coach is unknown or has no configured
/// rate; the training fee policy then falls back to its surcharge.
#[async_trait]
pub trait CoachRateRepository: Send + Sync {
    async fn find_hourly_rate(&self, coach_id: CoachId) -> AppResult<Option<Decimal>>;
}
