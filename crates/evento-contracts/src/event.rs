// Event DTOs and event-management requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Event lifecycle status (public mirror of the domain enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Approved,
    Rejected,
}

impl From<evento_core::EventStatus> for EventStatus {
    fn from(status: evento_core::EventStatus) -> Self {
        match status {
            evento_core::EventStatus::Pending => EventStatus::Pending,
            evento_core::EventStatus::Approved => EventStatus::Approved,
            evento_core::EventStatus::Rejected => EventStatus::Rejected,
        }
    }
}

impl From<EventStatus> for evento_core::EventStatus {
    fn from(status: EventStatus) -> Self {
        match status {
            EventStatus::Pending => evento_core::EventStatus::Pending,
            EventStatus::Approved => evento_core::EventStatus::Approved,
            EventStatus::Rejected => evento_core::EventStatus::Rejected,
        }
    }
}

/// Full event view, including seat counts derived from the collections
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub venue: String,
    pub club_name: Option<String>,
    pub organizer_id: Uuid,
    pub status: EventStatus,
    /// None = unlimited capacity
    pub max_participants: Option<u32>,
    pub participants: Vec<Uuid>,
    pub waitlist: Vec<Uuid>,
    pub participants_count: usize,
    pub waitlist_count: usize,
    pub average_rating: Option<f64>,
    pub feedback_requested: bool,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub venue: String,
    pub club_name: Option<String>,
    pub organizer_id: Uuid,
    pub max_participants: Option<u32>,
}

/// Partial update; omitted fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    /// Coordinator making the change; ownership-checked on the
    /// coordinator route, ignored on the admin route
    pub requested_by: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub club_name: Option<String>,
    pub max_participants: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApproveEventRequest {
    pub approved_by: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RejectEventRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RequestFeedbackRequest {
    pub requested_by: Uuid,
}

/// Query parameters for event listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct EventListQuery {
    /// Filter by lifecycle status; defaults to `approved`
    pub status: Option<EventStatus>,
}

/// Result of a bulk participant notification
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotifyParticipantsResponse {
    pub enqueued: usize,
    pub total_participants: usize,
}
