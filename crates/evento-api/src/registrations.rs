// Registration, unregistration, and feedback-submission HTTP routes
//
// These are the engine-backed operations; everything here goes through
// the versioned read-check-write cycle in evento-core.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use evento_contracts::{
    RegisterRequest, RegisterResponse, SubmitFeedbackRequest, SubmitFeedbackResponse,
    UnregisterRequest, UnregisterResponse,
};

use crate::error::ApiError;
use crate::services::RegistrationService;

/// App state for registration routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RegistrationService>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events/:event_id/register", post(register))
        .route("/v1/events/:event_id/unregister", post(unregister))
        .route("/v1/events/:event_id/feedback", post(submit_feedback))
        .with_state(state)
}

/// POST /v1/events/{event_id}/register - Take a seat or join the waitlist
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/register",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered or waitlisted", body = RegisterResponse),
        (status = 404, description = "Event or student not found"),
        (status = 409, description = "Already registered or waitlisted"),
        (status = 500, description = "Internal server error")
    ),
    tag = "registrations"
)]
pub async fn register(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let response = state.service.register(event_id, req.student_id).await?;
    Ok(Json(response))
}

/// POST /v1/events/{event_id}/unregister - Release a seat (promoting the
/// waitlist head) or leave the waitlist
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/unregister",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = UnregisterRequest,
    responses(
        (status = 200, description = "Unregistered", body = UnregisterResponse),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Not registered for this event"),
        (status = 500, description = "Internal server error")
    ),
    tag = "registrations"
)]
pub async fn unregister(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<UnregisterRequest>,
) -> Result<Json<UnregisterResponse>, ApiError> {
    let response = state.service.unregister(event_id, req.student_id).await?;
    Ok(Json(response))
}

/// POST /v1/events/{event_id}/feedback - One rating per participant
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/feedback",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 200, description = "Feedback recorded", body = SubmitFeedbackResponse),
        (status = 400, description = "Rating out of range"),
        (status = 403, description = "Submitter is not a participant"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Feedback already submitted"),
        (status = 500, description = "Internal server error")
    ),
    tag = "registrations"
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<SubmitFeedbackRequest>,
) -> Result<Json<SubmitFeedbackResponse>, ApiError> {
    let response = state.service.submit_feedback(event_id, req).await?;
    Ok(Json(response))
}
