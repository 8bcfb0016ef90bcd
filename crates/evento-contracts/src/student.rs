// Student DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::event::Event;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub register_no: String,
    pub department: String,
    pub year: String,
    /// Events the student holds a confirmed seat in (never waitlist entries)
    pub registered_events: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    pub name: String,
    pub email: String,
    pub register_no: String,
    pub department: String,
    pub year: String,
}

/// Per-student event view: confirmed seats and waitlist positions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentEvents {
    pub registered: Vec<Event>,
    pub waitlisted: Vec<Event>,
}
