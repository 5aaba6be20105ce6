use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{parse_day, AvailabilityQuery, CreateFacilityRequest};
use crate::api::dtos::responses::AvailabilityResponse;
use crate::domain::models::facility::NewFacility;
use crate::domain::models::request::BookingWindow;
use crate::domain::services::admission::{self, Decision};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_facilities(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let facilities = state.facility_repo.list_all().await?;
    Ok(Json(facilities))
}

pub async fn create_facility(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateFacilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let facility = NewFacility::new(&payload.name, payload.amount)?;
    let created = state.facility_repo.create(&facility).await?;
    info!("Created facility {} ({}) with {} unit(s)", created.id, created.name, created.amount);
    Ok(Json(created))
}

/// Dry run of the admission check; nothing is reserved.
pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Path(facility_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let window = BookingWindow::new(parse_day("start", &query.start)?, parse_day("end", &query.end)?)?;

    let facility = state.facility_repo.find_by_id(facility_id).await?
        .ok_or(AppError::NotFound("Facility not found".into()))?;

    let existing = state.request_repo.list_by_facility(facility.id).await?;
    let assessment = admission::assess(&facility, &window, &existing, query.exclude);

    Ok(Json(AvailabilityResponse {
        facility_id: facility.id,
        start: window.start(),
        end: window.end(),
        overlapping: assessment.overlapping,
        capacity: assessment.capacity,
        admitted: assessment.decision == Decision::Admit,
        decision: assessment.decision,
    }))
}
