use crate::domain::models::facility::Facility;
use crate::domain::models::request::{BookingRequest, BookingWindow, NewBookingRequest, RequestChange};
use crate::domain::ports::RequestRepository;
use crate::domain::services::admission::{self, Admission, CapacityConflict, Decision};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::debug;

const COLUMNS: &str = "id, facility_id, start_booking, end_booking, employee_id";

pub struct PostgresRequestRepo {
    pool: PgPool,
}

impl PostgresRequestRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row lock on the facility; every check-then-write for it queues behind this.
async fn lock_facility(conn: &mut PgConnection, facility_id: i64) -> Result<Facility, AppError> {
    sqlx::query_as::<_, Facility>("SELECT id, name, amount FROM facilities WHERE id = $1 FOR UPDATE")
        .bind(facility_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Validation("Facility not found".into()))
}

async fn count_overlapping(
    conn: &mut PgConnection,
    facility_id: i64,
    window: &BookingWindow,
    exclude_id: Option<i64>,
) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM requests
         WHERE facility_id = $1 AND start_booking <= $2 AND end_booking >= $3
           AND ($4::BIGINT IS NULL OR id <> $4)"
    )
        .bind(facility_id)
        .bind(window.end())
        .bind(window.start())
        .bind(exclude_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(AppError::Database)
}

#[async_trait]
impl RequestRepository for PostgresRequestRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<BookingRequest>, AppError> {
        sqlx::query_as::<_, BookingRequest>(&format!("SELECT {COLUMNS} FROM requests WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_for_employee(&self, employee_id: i64, id: i64) -> Result<Option<BookingRequest>, AppError> {
        sqlx::query_as::<_, BookingRequest>(&format!("SELECT {COLUMNS} FROM requests WHERE id = $1 AND employee_id = $2"))
            .bind(id)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<BookingRequest>, AppError> {
        sqlx::query_as::<_, BookingRequest>(&format!("SELECT {COLUMNS} FROM requests ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_employee(&self, employee_id: i64) -> Result<Vec<BookingRequest>, AppError> {
        sqlx::query_as::<_, BookingRequest>(&format!(
            "SELECT {COLUMNS} FROM requests WHERE employee_id = $1 ORDER BY start_booking ASC, id ASC"
        ))
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_facility(&self, facility_id: i64) -> Result<Vec<BookingRequest>, AppError> {
        sqlx::query_as::<_, BookingRequest>(&format!(
            "SELECT {COLUMNS} FROM requests WHERE facility_id = $1 ORDER BY start_booking ASC, id ASC"
        ))
            .bind(facility_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn reserve(&self, request: &NewBookingRequest) -> Result<Admission<BookingRequest>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let facility = lock_facility(&mut tx, request.facility_id).await?;
        let overlapping = count_overlapping(&mut tx, facility.id, &request.window, None).await?;

        if admission::decide(overlapping, &facility) == Decision::Reject {
            debug!(facility_id = facility.id, overlapping, capacity = facility.amount, "reservation rejected");
            return Ok(Admission::Rejected(CapacityConflict::new(&facility, overlapping)));
        }

        let created = sqlx::query_as::<_, BookingRequest>(&format!(
            "INSERT INTO requests (facility_id, start_booking, end_booking, employee_id) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
            .bind(request.facility_id)
            .bind(request.window.start())
            .bind(request.window.end())
            .bind(request.employee_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Admission::Admitted(created))
    }

    async fn reschedule(&self, id: i64, change: &RequestChange) -> Result<Admission<BookingRequest>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if exists.is_none() {
            return Err(AppError::NotFound("Request not found".into()));
        }

        let facility = lock_facility(&mut tx, change.facility_id).await?;
        let overlapping = count_overlapping(&mut tx, facility.id, &change.window, Some(id)).await?;

        if admission::decide(overlapping, &facility) == Decision::Reject {
            debug!(request_id = id, facility_id = facility.id, overlapping, "reschedule rejected");
            return Ok(Admission::Rejected(CapacityConflict::new(&facility, overlapping)));
        }

        let updated = sqlx::query_as::<_, BookingRequest>(&format!(
            "UPDATE requests SET facility_id = $1, start_booking = $2, end_booking = $3 WHERE id = $4 RETURNING {COLUMNS}"
        ))
            .bind(change.facility_id)
            .bind(change.window.start())
            .bind(change.window.end())
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Admission::Admitted(updated))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Request not found".into()));
        }
        Ok(())
    }

    async fn delete_by_employee(&self, employee_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM requests WHERE employee_id = $1")
            .bind(employee_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
