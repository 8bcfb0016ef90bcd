// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use evento_core::{EventRecord, EventStatus, FeedbackEntry, StudentRecord};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Event models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub venue: String,
    pub club_name: Option<String>,
    pub organizer_id: Uuid,
    pub status: String,
    pub max_participants: Option<i32>,
    pub participants: Vec<Uuid>,
    pub waitlist: Vec<Uuid>,
    pub feedback: Json<Vec<FeedbackEntry>>,
    pub average_rating: Option<f64>,
    pub feedback_requested: bool,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventRow {
    /// View of the row as the engine's domain record
    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            date: self.date,
            venue: self.venue.clone(),
            club_name: self.club_name.clone(),
            organizer_id: self.organizer_id,
            status: self.status.parse().unwrap_or_else(|err| {
                tracing::error!(event_id = %self.id, %err, "corrupt stored event status");
                EventStatus::Pending
            }),
            max_participants: self.max_participants.map(|n| n.max(0) as u32),
            participants: self.participants.clone(),
            waitlist: self.waitlist.clone(),
            feedback: self.feedback.0.clone(),
            average_rating: self.average_rating,
            feedback_requested: self.feedback_requested,
            version: self.version,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub venue: String,
    pub club_name: Option<String>,
    pub organizer_id: Uuid,
    pub max_participants: Option<i32>,
}

/// Detail edits (coordinator/admin); collection state goes through the
/// versioned save instead
#[derive(Debug, Clone, Default)]
pub struct UpdateEventDetails {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub club_name: Option<String>,
    pub max_participants: Option<i32>,
}

// ============================================
// Student models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub register_no: String,
    pub department: String,
    pub year: String,
    pub registered_events: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentRow {
    pub fn to_record(&self) -> StudentRecord {
        StudentRecord {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            register_no: self.register_no.clone(),
            department: self.department.clone(),
            year: self.year.clone(),
            registered_events: self.registered_events.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateStudent {
    pub name: String,
    pub email: String,
    pub register_no: String,
    pub department: String,
    pub year: String,
}

// ============================================
// Coordinator models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct CoordinatorRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: String,
    pub club_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateCoordinator {
    pub name: String,
    pub email: String,
    pub department: String,
    pub club_name: Option<String>,
}

// ============================================
// Attendance models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct AttendanceRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub student_id: Uuid,
    pub checked_in: bool,
    pub check_in_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================
// Notification models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub message: String,
    pub kind: String,
    pub related_event_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub recipient_id: Uuid,
    pub message: String,
    pub kind: String,
    pub related_event_id: Option<Uuid>,
}

// ============================================
// Analytics models
// ============================================

#[derive(Debug, Clone, Default)]
pub struct AnalyticsCounts {
    pub total_events: i64,
    pub approved_events: i64,
    pub pending_events: i64,
    pub rejected_events: i64,
    pub total_registrations: i64,
    pub total_attendance: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event_row(status: &str) -> EventRow {
        EventRow {
            id: Uuid::now_v7(),
            name: "Tech Talk".into(),
            description: "Guest lecture".into(),
            date: Utc::now(),
            venue: "Hall A".into(),
            club_name: None,
            organizer_id: Uuid::now_v7(),
            status: status.into(),
            max_participants: Some(40),
            participants: Vec::new(),
            waitlist: Vec::new(),
            feedback: Json(Vec::new()),
            average_rating: None,
            feedback_requested: false,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn stored_status_maps_to_the_domain_enum() {
        assert_eq!(event_row("approved").to_record().status, EventStatus::Approved);
        assert_eq!(event_row("rejected").to_record().status, EventStatus::Rejected);
    }

    #[test]
    fn corrupt_status_falls_back_to_pending() {
        assert_eq!(event_row("archived").to_record().status, EventStatus::Pending);
    }
}
