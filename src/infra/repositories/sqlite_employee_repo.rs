use crate::domain::{models::employee::Employee, ports::EmployeeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteEmployeeRepo {
    pool: SqlitePool,
}

impl SqliteEmployeeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for SqliteEmployeeRepo {
    async fn create(&self, fullname: &str) -> Result<Employee, AppError> {
        sqlx::query_as::<_, Employee>("INSERT INTO employees (fullname) VALUES (?) RETURNING id, fullname")
            .bind(fullname)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, AppError> {
        sqlx::query_as::<_, Employee>("SELECT id, fullname FROM employees WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_ids(&self) -> Result<Vec<i64>, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM employees ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn rename(&self, id: i64, fullname: &str) -> Result<Employee, AppError> {
        sqlx::query_as::<_, Employee>("UPDATE employees SET fullname = ? WHERE id = ? RETURNING id, fullname")
            .bind(fullname)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Employee not found".into()))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Employee not found".into()));
        }
        Ok(())
    }
}
