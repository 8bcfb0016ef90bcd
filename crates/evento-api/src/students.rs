// Student HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use evento_contracts::{CreateStudentRequest, ListResponse, Student, StudentEvents};

use crate::error::ApiError;
use crate::services::StudentService;

/// App state for student routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StudentService>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/students", post(create_student).get(list_students))
        .route("/v1/students/:student_id", get(get_student))
        .route("/v1/students/:student_id/events", get(student_events))
        .with_state(state)
}

/// POST /v1/students - Create a student
#[utoipa::path(
    post,
    path = "/v1/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Invalid input"),
        (status = 500, description = "Internal server error")
    ),
    tag = "students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let student = state.service.create(req).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// GET /v1/students - List all students
#[utoipa::path(
    get,
    path = "/v1/students",
    responses(
        (status = 200, description = "List of students", body = ListResponse<Student>),
        (status = 500, description = "Internal server error")
    ),
    tag = "students"
)]
pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Student>>, ApiError> {
    let students = state.service.list().await?;
    Ok(Json(ListResponse::new(students)))
}

/// GET /v1/students/{student_id} - Get student by ID
#[utoipa::path(
    get,
    path = "/v1/students/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Student>, ApiError> {
    let student = state.service.get(student_id).await?;
    Ok(Json(student))
}

/// GET /v1/students/{student_id}/events - Confirmed seats and waitlist
/// positions
#[utoipa::path(
    get,
    path = "/v1/students/{student_id}/events",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Registered and waitlisted events", body = StudentEvents),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "students"
)]
pub async fn student_events(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<StudentEvents>, ApiError> {
    let events = state.service.events(student_id).await?;
    Ok(Json(events))
}
