// Attendance HTTP routes

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use evento_contracts::{AttendanceResponse, AttendanceRoster};

use crate::error::ApiError;
use crate::services::AttendanceService;

/// App state for attendance routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AttendanceService>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/events/:event_id/attendance/:student_id",
            post(mark_attendance),
        )
        .route("/v1/events/:event_id/attendance", get(get_roster))
        .with_state(state)
}

/// POST /v1/events/{event_id}/attendance/{student_id} - Idempotent check-in
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/attendance/{student_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID"),
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Checked in", body = AttendanceResponse),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "attendance"
)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    Path((event_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let response = state.service.mark(event_id, student_id).await?;
    Ok(Json(response))
}

/// GET /v1/events/{event_id}/attendance - Roster with present/absent per
/// participant
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/attendance",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Attendance roster", body = AttendanceRoster),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "attendance"
)]
pub async fn get_roster(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<AttendanceRoster>, ApiError> {
    let roster = state.service.roster(event_id).await?;
    Ok(Json(roster))
}
