use facility_booking::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_employee_repo::SqliteEmployeeRepo,
        sqlite_facility_repo::SqliteFacilityRepo,
        sqlite_request_repo::SqliteRequestRepo,
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::Value;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            max_connections: Some(8),
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::new(SqliteEmployeeRepo::new(pool.clone())),
            Arc::new(SqliteFacilityRepo::new(pool.clone())),
            Arc::new(SqliteRequestRepo::new(pool.clone())),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    pub async fn create_employee(&self, fullname: &str) -> i64 {
        let (status, body) = self.send("POST", "/api/employee", Some(serde_json::json!({ "fullname": fullname }))).await;
        assert_eq!(status, StatusCode::OK, "employee creation failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn create_facility(&self, name: &str, amount: i32) -> i64 {
        let (status, body) = self.send("POST", "/api/facilities", Some(serde_json::json!({ "name": name, "amount": amount }))).await;
        assert_eq!(status, StatusCode::OK, "facility creation failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Returns the status and, when created, the new request id.
    pub async fn book(&self, employee_id: i64, facility_id: i64, start: &str, end: &str) -> (StatusCode, Option<i64>) {
        let (status, body) = self.send(
            "POST",
            &format!("/api/employee/{}/request", employee_id),
            Some(serde_json::json!({ "facility_id": facility_id, "start_booking": start, "end_booking": end })),
        ).await;
        (status, body["id"].as_i64())
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
