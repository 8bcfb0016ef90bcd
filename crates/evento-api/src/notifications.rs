// In-app notification HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use evento_contracts::{ListResponse, Notification};

use crate::error::ApiError;
use crate::services::NotificationService;

/// App state for notification routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<NotificationService>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/notifications/:student_id", get(list_notifications))
        .route(
            "/v1/notifications/:notification_id/read",
            post(mark_notification_read),
        )
        .with_state(state)
}

/// GET /v1/notifications/{student_id} - Notifications for a student,
/// newest first
#[utoipa::path(
    get,
    path = "/v1/notifications/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Notifications", body = ListResponse<Notification>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<ListResponse<Notification>>, ApiError> {
    let notifications = state.service.list_for(student_id).await?;
    Ok(Json(ListResponse::new(notifications)))
}

/// POST /v1/notifications/{notification_id}/read - Mark as read
#[utoipa::path(
    post,
    path = "/v1/notifications/{notification_id}/read",
    params(("notification_id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 404, description = "Notification not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notifications"
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.mark_read(notification_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
