use crate::database::{model::booking::BookingRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::booking::event::NewBooking;
use kernel::model::booking::{Booking, BookingStatus};
use kernel::model::id::{BookingId, FacilityId};
use kernel::model::slot::TimeSlot;
use kernel::repository::booking::{BookingRepository, CreateOutcome, StatusUpdate};
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    // The conflict check and the insert run in one SERIALIZABLE
    // transaction, and the bookings table additionally carries a partial
    // exclusion constraint over confirmed rows. Whichever of the two
    // trips first, the caller sees the same Conflict outcome.
    async fn create(&self, event: NewBooking) -> AppResult<CreateOutcome> {
        let mut tx = self.db.begin().await?;

        self.set_transaction_serializable(&mut tx).await?;

        let taken: Option<i32> = sqlx::query_scalar(
            r#"
                SELECT 1
                FROM bookings
                WHERE facility_id = $1
                  AND status = 'confirmed'
                  AND start_time < $3
                  AND $2 < end_time
                LIMIT 1
            "#,
        )
        .bind(event.facility_id)
        .bind(event.slot.start())
        .bind(event.slot.end())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if taken.is_some() {
            return Ok(CreateOutcome::Conflict);
        }

        let booking_id = BookingId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO bookings
                (booking_id, facility_id, member_id, coach_id, kind, status,
                 start_time, end_time, facility_fee, coach_fee, total_fee, reserved_at)
                VALUES ($1, $2, $3, $4, $5, 'confirmed', $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(booking_id)
        .bind(event.facility_id)
        .bind(event.member_id)
        .bind(event.coach_id)
        .bind(event.kind.as_str())
        .bind(event.slot.start())
        .bind(event.slot.end())
        .bind(event.fees.facility_fee)
        .bind(event.fees.coach_fee)
        .bind(event.fees.total)
        .bind(event.reserved_at)
        .execute(&mut *tx)
        .await;

        match res {
            Ok(done) if done.rows_affected() < 1 => {
                return Err(AppError::NoRowsAffectedError(
                    "no booking record has been created".into(),
                ))
            }
            Ok(_) => {}
            Err(e) if is_slot_taken(&e) => return Ok(CreateOutcome::Conflict),
            Err(e) => return Err(AppError::SpecificOperationError(e)),
        }

        if let Err(e) = tx.commit().await {
            if is_slot_taken(&e) {
                return Ok(CreateOutcome::Conflict);
            }
            return Err(AppError::TransactionError(e));
        }

        Ok(CreateOutcome::Created(Booking {
            booking_id,
            facility_id: event.facility_id,
            member_id: event.member_id,
            coach_id: event.coach_id,
            kind: event.kind,
            status: BookingStatus::Confirmed,
            slot: event.slot,
            fees: event.fees,
            reserved_at: event.reserved_at,
        }))
    }

    // Guarded so that two racing cancels cannot both report success; the
    // loser observes zero affected rows.
    async fn update_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> AppResult<StatusUpdate> {
        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET status = $1
                WHERE booking_id = $2
                  AND status <> $1
            "#,
        )
        .bind(status.as_str())
        .bind(booking_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            Ok(StatusUpdate::Unchanged)
        } else {
            Ok(StatusUpdate::Applied)
        }
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(
            r#"
                SELECT
                    booking_id, facility_id, member_id, coach_id,
                    kind, status, start_time, end_time,
                    facility_fee, coach_fee, total_fee, reserved_at
                FROM bookings
                WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_overlapping(
        &self,
        facility_id: FacilityId,
        slot: &TimeSlot,
    ) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            r#"
                SELECT
                    booking_id, facility_id, member_id, coach_id,
                    kind, status, start_time, end_time,
                    facility_fee, coach_fee, total_fee, reserved_at
                FROM bookings
                WHERE facility_id = $1
                  AND start_time < $3
                  AND $2 < end_time
                ORDER BY start_time ASC
            "#,
        )
        .bind(facility_id)
        .bind(slot.start())
        .bind(slot.end())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn exists_confirmed_overlap(
        &self,
        facility_id: FacilityId,
        slot: &TimeSlot,
    ) -> AppResult<bool> {
        sqlx::query_scalar(
            r#"
                SELECT EXISTS (
                    SELECT 1
                    FROM bookings
                    WHERE facility_id = $1
                      AND status = 'confirmed'
                      AND start_time < $3
                      AND $2 < end_time
                )
            "#,
        )
        .bind(facility_id)
        .bind(slot.start())
        .bind(slot.end())
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }
}

impl BookingRepositoryImpl {
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}

/// 23P01 is the exclusion constraint on confirmed bookings; 40001 is a
/// serialization failure of the SERIALIZABLE transaction. Both mean a
/// concurrent writer took the slot between our check and our commit.
fn is_slot_taken(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            matches!(db.code().as_deref(), Some("23P01") | Some("40001"))
        }
        _ => false,
    }
}
