// Real-time notices fanned out to subscribed viewers
//
// Notices are notifications, not primary data: best-effort, at-most-once,
// no replay. Seat updates go to the event's own topic; activity signals and
// announcements go to the global topic.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fan-out channel a notice is published on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Viewers watching one event (seat counts)
    Event(Uuid),
    /// Dashboard-wide listeners
    Global,
}

/// Payloads published by the engine and the event service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    /// Current seat counts after a registration-side mutation
    SeatUpdate {
        event_id: Uuid,
        participants_count: usize,
        waitlist_count: usize,
    },
    /// A registration happened somewhere; dashboards refresh off this
    RegistrationActivity { event_id: Uuid },
    /// A new event was published for approval
    NewEvent { event_id: Uuid, name: String },
    /// The organizer asked participants for feedback
    FeedbackRequested { event_id: Uuid, name: String },
    /// Event details (date/venue/description) changed
    EventUpdated { event_id: Uuid },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_update_serializes_with_type_tag() {
        let notice = Notice::SeatUpdate {
            event_id: Uuid::nil(),
            participants_count: 12,
            waitlist_count: 3,
        };
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["type"], "seat_update");
        assert_eq!(json["participants_count"], 12);
        assert_eq!(json["waitlist_count"], 3);
    }
}
