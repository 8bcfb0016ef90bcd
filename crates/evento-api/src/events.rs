// Event CRUD, approval, and mailing HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use evento_contracts::{
    ApproveEventRequest, CreateEventRequest, Event, EventListQuery, FeedbackList, ListResponse,
    NotifyParticipantsResponse, RejectEventRequest, RequestFeedbackRequest, UpdateEventRequest,
};

use crate::error::ApiError;
use crate::services::EventService;

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(create_event).get(list_events))
        .route("/v1/events/:event_id", get(get_event).patch(update_event))
        .route("/v1/events/:event_id/notify", post(notify_participants))
        .route(
            "/v1/events/:event_id/request-feedback",
            post(request_feedback),
        )
        .route("/v1/events/:event_id/feedback", get(list_feedback))
        .route(
            "/v1/admin/events/:event_id",
            patch(admin_update_event).delete(delete_event),
        )
        .route("/v1/admin/events/:event_id/approve", post(approve_event))
        .route("/v1/admin/events/:event_id/reject", post(reject_event))
        .with_state(state)
}

/// POST /v1/events - Publish a new event for approval
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created in pending state", body = Event),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Organizer not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state.service.create(req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /v1/events - List events by status (default approved)
#[utoipa::path(
    get,
    path = "/v1/events",
    params(EventListQuery),
    responses(
        (status = 200, description = "List of events", body = ListResponse<Event>),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<ListResponse<Event>>, ApiError> {
    let events = state.service.list(query.status.map(Into::into)).await?;
    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = state.service.get(event_id).await?;
    Ok(Json(event))
}

/// PATCH /v1/events/{event_id} - Organizer edit; emails participants on
/// date/venue/description changes
#[utoipa::path(
    patch,
    path = "/v1/events/{event_id}",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 403, description = "Requester is not the organizer"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let event = state.service.update(event_id, req, true).await?;
    Ok(Json(event))
}

/// PATCH /v1/admin/events/{event_id} - Admin edit, no ownership check
#[utoipa::path(
    patch,
    path = "/v1/admin/events/{event_id}",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "admin"
)]
pub async fn admin_update_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let event = state.service.update(event_id, req, false).await?;
    Ok(Json(event))
}

/// DELETE /v1/admin/events/{event_id}
#[utoipa::path(
    delete,
    path = "/v1/admin/events/{event_id}",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "admin"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/admin/events/{event_id}/approve
#[utoipa::path(
    post,
    path = "/v1/admin/events/{event_id}/approve",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = ApproveEventRequest,
    responses(
        (status = 200, description = "Event approved", body = Event),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "admin"
)]
pub async fn approve_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<ApproveEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let event = state.service.approve(event_id, req.approved_by).await?;
    Ok(Json(event))
}

/// POST /v1/admin/events/{event_id}/reject - Reject with a reason; the
/// organizer is emailed
#[utoipa::path(
    post,
    path = "/v1/admin/events/{event_id}/reject",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = RejectEventRequest,
    responses(
        (status = 200, description = "Event rejected", body = Event),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "admin"
)]
pub async fn reject_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<RejectEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let event = state.service.reject(event_id, req.reason).await?;
    Ok(Json(event))
}

/// POST /v1/events/{event_id}/notify - Enqueue reminder emails to all
/// participants
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/notify",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Reminder emails enqueued", body = NotifyParticipantsResponse),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn notify_participants(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<NotifyParticipantsResponse>, ApiError> {
    let result = state.service.notify_participants(event_id).await?;
    Ok(Json(result))
}

/// POST /v1/events/{event_id}/request-feedback - Once per event
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/request-feedback",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = RequestFeedbackRequest,
    responses(
        (status = 200, description = "Feedback requested", body = Event),
        (status = 403, description = "Requester is not the organizer"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Feedback already requested"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn request_feedback(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<RequestFeedbackRequest>,
) -> Result<Json<Event>, ApiError> {
    let event = state
        .service
        .request_feedback(event_id, req.requested_by)
        .await?;
    Ok(Json(event))
}

/// GET /v1/events/{event_id}/feedback - Feedback entries with average
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/feedback",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Feedback list", body = FeedbackList),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_feedback(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<FeedbackList>, ApiError> {
    let feedback = state.service.feedback(event_id).await?;
    Ok(Json(feedback))
}
