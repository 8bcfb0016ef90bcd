// Admin stats and analytics HTTP routes

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use evento_contracts::{AdminStats, AnalyticsQuery, MonthlyAnalytics};

use crate::error::ApiError;
use crate::services::StatsService;

/// App state for stats routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StatsService>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/admin/stats", get(admin_stats))
        .route("/v1/admin/analytics", get(analytics))
        .with_state(state)
}

/// GET /v1/admin/stats - Dashboard totals
#[utoipa::path(
    get,
    path = "/v1/admin/stats",
    responses(
        (status = 200, description = "Totals", body = AdminStats),
        (status = 500, description = "Internal server error")
    ),
    tag = "admin"
)]
pub async fn admin_stats(State(state): State<AppState>) -> Result<Json<AdminStats>, ApiError> {
    let stats = state.service.admin_stats().await?;
    Ok(Json(stats))
}

/// GET /v1/admin/analytics?month=&year= - Per-period summary
#[utoipa::path(
    get,
    path = "/v1/admin/analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Period summary", body = MonthlyAnalytics),
        (status = 400, description = "Invalid month"),
        (status = 500, description = "Internal server error")
    ),
    tag = "admin"
)]
pub async fn analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<MonthlyAnalytics>, ApiError> {
    let analytics = state.service.analytics(query).await?;
    Ok(Json(analytics))
}
