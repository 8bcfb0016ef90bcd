// Attendance DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceResponse {
    pub checked_in: bool,
    pub check_in_time: Option<DateTime<Utc>>,
}

/// One participant in the roster, present/absent derived from the
/// attendance rows (no row = absent)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RosterEntry {
    pub student_id: Uuid,
    pub name: Option<String>,
    pub register_no: Option<String>,
    pub checked_in: bool,
    pub check_in_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRoster {
    pub event_id: Uuid,
    pub event_name: String,
    pub total_registered: usize,
    pub total_attended: usize,
    pub entries: Vec<RosterEntry>,
}
