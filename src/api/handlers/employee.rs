use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::EmployeeRequest;
use crate::api::dtos::responses::{CreatedResponse, OkResponse};
use crate::domain::models::employee::{normalize_fullname, EmployeeDetails};
use crate::domain::services::employee_cache::EmployeeMutation;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

fn required_fullname(payload: EmployeeRequest) -> Result<String, AppError> {
    let raw = payload.fullname.ok_or(AppError::Validation("fullname is required".into()))?;
    normalize_fullname(&raw)
}

pub async fn list_employee_ids(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let ids = state.employee_cache.get().await?;
    Ok(Json(ids))
}

pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EmployeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let fullname = required_fullname(payload)?;
    let created = state.employee_repo.create(&fullname).await?;
    state.employee_cache.invalidate_on(EmployeeMutation::Created(created.id)).await;

    info!("Created employee {}", created.id);
    Ok(Json(CreatedResponse::new(created.id)))
}

pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let employee = state.employee_repo.find_by_id(employee_id).await?
        .ok_or(AppError::NotFound("Employee not found".into()))?;

    let requests = state.request_repo.list_by_employee(employee.id).await?;
    Ok(Json(EmployeeDetails { employee, requests }))
}

pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<i64>,
    Json(payload): Json<EmployeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let fullname = required_fullname(payload)?;
    let updated = state.employee_repo.rename(employee_id, &fullname).await?;
    state.employee_cache.invalidate_on(EmployeeMutation::Renamed(updated.id)).await;

    info!("Renamed employee {}", updated.id);
    Ok(Json(OkResponse::ok()))
}

/// Removes the employee's requests first, then the employee row.
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let employee = state.employee_repo.find_by_id(employee_id).await?
        .ok_or(AppError::NotFound("Employee not found".into()))?;

    let removed = state.request_repo.delete_by_employee(employee.id).await?;
    state.employee_repo.delete(employee.id).await?;
    state.employee_cache.invalidate_on(EmployeeMutation::Deleted(employee.id)).await;

    info!("Deleted employee {} together with {} request(s)", employee.id, removed);
    Ok(Json(OkResponse::ok()))
}
