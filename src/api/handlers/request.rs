use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{parse_day, CreateBookingRequest, UpdateBookingRequest};
use crate::api::dtos::responses::{CreatedResponse, OkResponse, RequestDetailsResponse};
use crate::domain::models::facility::Facility;
use crate::domain::models::request::{BookingWindow, NewBookingRequest, RequestChange};
use crate::domain::services::admission::Admission;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

async fn existing_facility(state: &AppState, facility_id: i64) -> Result<Facility, AppError> {
    state.facility_repo.find_by_id(facility_id).await?
        .ok_or(AppError::Validation("Facility not found".into()))
}

pub async fn list_requests(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let requests = state.request_repo.list_all().await?;
    Ok(Json(requests))
}

pub async fn create_request(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<i64>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(facility_id), Some(start), Some(end)) = (payload.facility_id, payload.start_booking, payload.end_booking) else {
        return Err(AppError::Validation("facility_id, start_booking and end_booking are required".into()));
    };

    let window = BookingWindow::new(parse_day("start_booking", &start)?, parse_day("end_booking", &end)?)?;

    state.employee_repo.find_by_id(employee_id).await?
        .ok_or(AppError::NotFound("Employee not found".into()))?;
    let facility = existing_facility(&state, facility_id).await?;

    let outcome = state.request_repo.reserve(&NewBookingRequest {
        facility_id: facility.id,
        employee_id,
        window,
    }).await?;

    if let Admission::Rejected(conflict) = &outcome {
        warn!(
            "Request rejected: facility {} has {} of {} unit(s) booked between {} and {}",
            conflict.facility_id, conflict.overlapping, conflict.capacity, window.start(), window.end()
        );
    }
    let created = outcome.into_result()?;

    info!("Request {} created for employee {} on facility {}", created.id, employee_id, facility.id);
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(created.id))))
}

pub async fn get_request(
    State(state): State<Arc<AppState>>,
    Path((employee_id, request_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let request = state.request_repo.find_for_employee(employee_id, request_id).await?
        .ok_or(AppError::NotFound("Not Found".into()))?;

    let facility = state.facility_repo.find_by_id(request.facility_id).await?
        .ok_or(AppError::NotFound("Facility not found".into()))?;

    Ok(Json(RequestDetailsResponse { request, facility }))
}

/// Partial update. Omitted fields keep their stored value, and the request
/// never counts against itself when the new range is checked.
pub async fn update_request(
    State(state): State<Arc<AppState>>,
    Path((employee_id, request_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let current = state.request_repo.find_for_employee(employee_id, request_id).await?
        .ok_or(AppError::NotFound("Not Found".into()))?;

    let facility_id = payload.facility_id.unwrap_or(current.facility_id);
    let start = match payload.start_booking {
        Some(raw) => parse_day("start_booking", &raw)?,
        None => current.start_booking,
    };
    let end = match payload.end_booking {
        Some(raw) => parse_day("end_booking", &raw)?,
        None => current.end_booking,
    };
    let window = BookingWindow::new(start, end)?;
    let facility = existing_facility(&state, facility_id).await?;

    let outcome = state.request_repo.reschedule(current.id, &RequestChange {
        facility_id: facility.id,
        window,
    }).await?;

    if let Admission::Rejected(conflict) = &outcome {
        warn!(
            "Update of request {} rejected: facility {} has {} of {} unit(s) booked",
            current.id, conflict.facility_id, conflict.overlapping, conflict.capacity
        );
    }
    let updated = outcome.into_result()?;

    info!("Request {} moved to facility {} for {} .. {}", updated.id, updated.facility_id, updated.start_booking, updated.end_booking);
    Ok(Json(OkResponse::ok()))
}

pub async fn delete_request(
    State(state): State<Arc<AppState>>,
    Path((employee_id, request_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let request = state.request_repo.find_for_employee(employee_id, request_id).await?
        .ok_or(AppError::NotFound("Not Found".into()))?;

    state.request_repo.delete(request.id).await?;
    info!("Request {} deleted", request.id);
    Ok(Json(OkResponse::ok()))
}
