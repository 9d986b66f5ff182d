use crate::database::ConnectionPool;
use async_trait::async_trait;
use derive_new::new;
use kernel::model::id::CoachId;
use kernel::repository::coach::CoachRateRepository;
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};

/// The coach roster is maintained by the membership system; this side
/// only ever reads the hourly rate.
#[derive(new)]
pub struct CoachRateRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl CoachRateRepository for CoachRateRepositoryImpl {
    async fn find_hourly_rate(&self, coach_id: CoachId) -> AppResult<Option<Decimal>> {
        sqlx::query_scalar(
            r#"
                SELECT hourly_rate
                FROM coaches
                WHERE coach_id = $1
            "#,
        )
        .bind(coach_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::DbQueryError)
    }
}
