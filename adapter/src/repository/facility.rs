use crate::database::{model::facility::FacilityRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::facility::event::{CreateFacility, UpdateFacility};
use kernel::model::facility::Facility;
use kernel::model::id::FacilityId;
use kernel::repository::facility::FacilityRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct FacilityRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl FacilityRepository for FacilityRepositoryImpl {
    async fn create(&self, event: CreateFacility) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO facilities (facility_name, hourly_rate, is_open, description, address)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.facility_name)
        .bind(event.hourly_rate)
        .bind(event.is_open)
        .bind(event.description)
        .bind(event.address)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::DbQueryError)?;

        Ok(())
    }

    async fn find_all(&self) -> AppResult<Vec<Facility>> {
        let rows: Vec<FacilityRow> = sqlx::query_as(
            r#"
                SELECT
                    facility_id, facility_name, hourly_rate,
                    is_open, description, address
                FROM facilities
                ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::DbQueryError)?;

        Ok(rows.into_iter().map(Facility::from).collect())
    }

    async fn find_by_id(&self, facility_id: FacilityId) -> AppResult<Option<Facility>> {
        let row: Option<FacilityRow> = sqlx::query_as(
            r#"
                SELECT
                    facility_id, facility_name, hourly_rate,
                    is_open, description, address
                FROM facilities
                WHERE facility_id = $1
            "#,
        )
        .bind(facility_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::DbQueryError)?;

        Ok(row.map(Facility::from))
    }

    // Rate changes only affect bookings made afterwards; stored fee
    // columns are never rewritten.
    async fn update(&self, event: UpdateFacility) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE facilities
                SET facility_name = COALESCE($2, facility_name),
                    hourly_rate = COALESCE($3, hourly_rate),
                    is_open = COALESCE($4, is_open),
                    description = COALESCE($5, description),
                    address = COALESCE($6, address)
                WHERE facility_id = $1
            "#,
        )
        .bind(event.facility_id)
        .bind(event.facility_name)
        .bind(event.hourly_rate)
        .bind(event.is_open)
        .bind(event.description)
        .bind(event.address)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::DbQueryError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "facility {} was not found",
                event.facility_id
            )));
        }

        Ok(())
    }
}
