// Domain records mutated by the registration engine
//
// Events are handled document-style: one record carries the participant,
// waitlist, and feedback collections so a single versioned save covers all
// of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Event lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Approved,
    Rejected,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Approved => "approved",
            EventStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EventStatus::Pending),
            "approved" => Ok(EventStatus::Approved),
            "rejected" => Ok(EventStatus::Rejected),
            other => Err(format!("unknown event status: {other}")),
        }
    }
}

/// One feedback entry; at most one per student per event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub student_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Event record as the engine sees it
#[derive(Debug, Clone)]
pub struct EventRecord {
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
    /// Registration order, no duplicates
    pub participants: Vec<Uuid>,
    /// FIFO, no duplicates; unbounded
    pub waitlist: Vec<Uuid>,
    pub feedback: Vec<FeedbackEntry>,
    pub average_rating: Option<f64>,
    pub feedback_requested: bool,
    /// Optimistic-concurrency check for saves
    pub version: i64,
}

impl EventRecord {
    /// True when a capacity limit is set and every seat is taken
    pub fn is_full(&self) -> bool {
        matches!(self.max_participants, Some(max) if self.participants.len() >= max as usize)
    }

    pub fn is_participant(&self, student_id: Uuid) -> bool {
        self.participants.contains(&student_id)
    }

    pub fn is_waitlisted(&self, student_id: Uuid) -> bool {
        self.waitlist.contains(&student_id)
    }

    /// Recompute the average rating from the full feedback list. Always a
    /// full recomputation, never incremental, so repeated submissions can
    /// not drift.
    pub fn recompute_average_rating(&mut self) {
        if self.feedback.is_empty() {
            self.average_rating = None;
        } else {
            let total: u32 = self.feedback.iter().map(|f| u32::from(f.rating)).sum();
            self.average_rating = Some(f64::from(total) / self.feedback.len() as f64);
        }
    }
}

/// Student record; `registered_events` mirrors confirmed participations
/// only, never waitlist entries
#[derive(Debug, Clone)]
pub struct StudentRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub register_no: String,
    pub department: String,
    pub year: String,
    pub registered_events: Vec<Uuid>,
}

/// One attendance row per (event, student) pair, created lazily on first mark
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub event_id: Uuid,
    pub student_id: Uuid,
    pub checked_in: bool,
    pub check_in_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(max: Option<u32>, participants: usize) -> EventRecord {
        EventRecord {
            id: Uuid::now_v7(),
            name: "Tech Symposium".into(),
            description: "Annual tech symposium".into(),
            date: Utc::now(),
            venue: "Main Auditorium".into(),
            club_name: None,
            organizer_id: Uuid::now_v7(),
            status: EventStatus::Approved,
            max_participants: max,
            participants: (0..participants).map(|_| Uuid::now_v7()).collect(),
            waitlist: Vec::new(),
            feedback: Vec::new(),
            average_rating: None,
            feedback_requested: false,
            version: 1,
        }
    }

    #[test]
    fn unlimited_capacity_is_never_full() {
        assert!(!event(None, 10_000).is_full());
    }

    #[test]
    fn full_exactly_at_capacity() {
        assert!(!event(Some(3), 2).is_full());
        assert!(event(Some(3), 3).is_full());
    }

    #[test]
    fn average_rating_is_mean_of_entries() {
        let mut ev = event(None, 0);
        for rating in [3, 5] {
            ev.feedback.push(FeedbackEntry {
                student_id: Uuid::now_v7(),
                rating,
                comment: None,
                submitted_at: Utc::now(),
            });
        }
        ev.recompute_average_rating();
        assert_eq!(ev.average_rating, Some(4.0));
    }

    #[test]
    fn average_rating_clears_when_empty() {
        let mut ev = event(None, 0);
        ev.average_rating = Some(4.2);
        ev.recompute_average_rating();
        assert_eq!(ev.average_rating, None);
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [EventStatus::Pending, EventStatus::Approved, EventStatus::Rejected] {
            assert_eq!(status.as_str().parse::<EventStatus>().unwrap(), status);
        }
        assert!("archived".parse::<EventStatus>().is_err());
    }
}
