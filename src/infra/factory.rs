use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_employee_repo::PostgresEmployeeRepo, postgres_facility_repo::PostgresFacilityRepo,
    postgres_request_repo::PostgresRequestRepo,
    sqlite_employee_repo::SqliteEmployeeRepo, sqlite_facility_repo::SqliteFacilityRepo,
    sqlite_request_repo::SqliteRequestRepo,
};

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    if config.is_postgres() {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url.parse().map_err(AppError::Database)?;
        let opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections.unwrap_or(10))
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;

        Ok(AppState::new(
            config.clone(),
            Arc::new(PostgresEmployeeRepo::new(pool.clone())),
            Arc::new(PostgresFacilityRepo::new(pool.clone())),
            Arc::new(PostgresRequestRepo::new(pool)),
        ))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.unwrap_or(5))
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;

        Ok(AppState::new(
            config.clone(),
            Arc::new(SqliteEmployeeRepo::new(pool.clone())),
            Arc::new(SqliteFacilityRepo::new(pool.clone())),
            Arc::new(SqliteRequestRepo::new(pool)),
        ))
    }
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres").run(pool).await?;
    Ok(())
}

async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite").run(pool).await?;
    Ok(())
}
