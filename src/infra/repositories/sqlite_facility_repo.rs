use crate::domain::{models::facility::{Facility, NewFacility}, ports::FacilityRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteFacilityRepo {
    pool: SqlitePool,
}

impl SqliteFacilityRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FacilityRepository for SqliteFacilityRepo {
    async fn create(&self, facility: &NewFacility) -> Result<Facility, AppError> {
        sqlx::query_as::<_, Facility>("INSERT INTO facilities (name, amount) VALUES (?, ?) RETURNING id, name, amount")
            .bind(&facility.name)
            .bind(facility.amount)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Facility>, AppError> {
        sqlx::query_as::<_, Facility>("SELECT id, name, amount FROM facilities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Facility>, AppError> {
        sqlx::query_as::<_, Facility>("SELECT id, name, amount FROM facilities ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
