use std::env;
use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Pool size override; the factory picks a per-driver default when unset.
    pub max_connections: Option<u32>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| AppError::Config("PORT must be a number".into()))?;

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => Some(raw.parse().map_err(|_| AppError::Config("DB_MAX_CONNECTIONS must be a number".into()))?),
            Err(_) => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://facility_booking.db".to_string()),
            port,
            max_connections,
        })
    }

    pub fn is_postgres(&self) -> bool {
        self.database_url.starts_with("postgres://") || self.database_url.starts_with("postgresql://")
    }
}
