// Coordinator HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use evento_contracts::{Coordinator, CreateCoordinatorRequest, Event, ListResponse};

use crate::error::ApiError;
use crate::services::{CoordinatorService, EventService};

/// App state for coordinator routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CoordinatorService>,
    pub events: Arc<EventService>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/coordinators",
            post(create_coordinator).get(list_coordinators),
        )
        .route("/v1/coordinators/:coordinator_id", get(get_coordinator))
        .route(
            "/v1/coordinators/:coordinator_id/events",
            get(coordinator_events),
        )
        .with_state(state)
}

/// POST /v1/coordinators - Create a coordinator
#[utoipa::path(
    post,
    path = "/v1/coordinators",
    request_body = CreateCoordinatorRequest,
    responses(
        (status = 201, description = "Coordinator created", body = Coordinator),
        (status = 400, description = "Invalid input"),
        (status = 500, description = "Internal server error")
    ),
    tag = "coordinators"
)]
pub async fn create_coordinator(
    State(state): State<AppState>,
    Json(req): Json<CreateCoordinatorRequest>,
) -> Result<(StatusCode, Json<Coordinator>), ApiError> {
    let coordinator = state.service.create(req).await?;
    Ok((StatusCode::CREATED, Json(coordinator)))
}

/// GET /v1/coordinators - List all coordinators
#[utoipa::path(
    get,
    path = "/v1/coordinators",
    responses(
        (status = 200, description = "List of coordinators", body = ListResponse<Coordinator>),
        (status = 500, description = "Internal server error")
    ),
    tag = "coordinators"
)]
pub async fn list_coordinators(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Coordinator>>, ApiError> {
    let coordinators = state.service.list().await?;
    Ok(Json(ListResponse::new(coordinators)))
}

/// GET /v1/coordinators/{coordinator_id} - Get coordinator by ID
#[utoipa::path(
    get,
    path = "/v1/coordinators/{coordinator_id}",
    params(("coordinator_id" = Uuid, Path, description = "Coordinator ID")),
    responses(
        (status = 200, description = "Coordinator found", body = Coordinator),
        (status = 404, description = "Coordinator not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "coordinators"
)]
pub async fn get_coordinator(
    State(state): State<AppState>,
    Path(coordinator_id): Path<Uuid>,
) -> Result<Json<Coordinator>, ApiError> {
    let coordinator = state.service.get(coordinator_id).await?;
    Ok(Json(coordinator))
}

/// GET /v1/coordinators/{coordinator_id}/events - Events organized by this
/// coordinator, any status
#[utoipa::path(
    get,
    path = "/v1/coordinators/{coordinator_id}/events",
    params(("coordinator_id" = Uuid, Path, description = "Coordinator ID")),
    responses(
        (status = 200, description = "Organized events", body = ListResponse<Event>),
        (status = 404, description = "Coordinator not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "coordinators"
)]
pub async fn coordinator_events(
    State(state): State<AppState>,
    Path(coordinator_id): Path<Uuid>,
) -> Result<Json<ListResponse<Event>>, ApiError> {
    state.service.ensure_exists(coordinator_id).await?;
    let events = state.events.list_by_organizer(coordinator_id).await?;
    Ok(Json(ListResponse::new(events)))
}
