// Admin stats and analytics DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminStats {
    pub total_students: i64,
    pub total_coordinators: i64,
    pub total_events: i64,
    pub total_registrations: i64,
}

/// Query parameters for monthly analytics
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AnalyticsQuery {
    /// 1-12; defaults to the whole year
    pub month: Option<u32>,
    /// Defaults to the current year
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsSummary {
    pub total_events: i64,
    pub approved_events: i64,
    pub pending_events: i64,
    pub rejected_events: i64,
    pub total_registrations: i64,
    pub total_attendance: i64,
    /// Percentage, 0-100, rounded
    pub attendance_rate: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlyAnalytics {
    pub month: Option<u32>,
    pub year: i32,
    pub summary: AnalyticsSummary,
}
