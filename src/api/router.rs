use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, employee, facility, request};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Employees
        .route("/api/employee", get(employee::list_employee_ids).post(employee::create_employee))
        .route("/api/employee/", get(employee::list_employee_ids).post(employee::create_employee))
        .route("/api/employee/{id}", get(employee::get_employee).patch(employee::update_employee).delete(employee::delete_employee))

        // Booking requests
        .route("/api/employee/{id}/request", post(request::create_request))
        .route("/api/employee/{id}/request/{req_id}", get(request::get_request).patch(request::update_request).delete(request::delete_request))
        .route("/api/request", get(request::list_requests))

        // Facilities
        .route("/api/facilities", get(facility::list_facilities).post(facility::create_facility))
        .route("/api/facilities/{id}/availability", get(facility::check_availability))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
