// Collaborator traits for pluggable backends
//
// These traits let the registration engine run against different backends:
// - In-memory implementations for tests and examples (see `memory`)
// - Postgres implementations for production (evento-storage)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AttendanceRecord, EventRecord, StudentRecord};
use crate::email::OutboundEmail;
use crate::error::Result;
use crate::notice::{Notice, Topic};

/// Result of a version-checked save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// State persisted, stored version bumped
    Saved,
    /// The stored version no longer matched; the caller must re-read and
    /// re-run its checks before trying again
    Conflict,
}

/// Persistence for event records
///
/// `save` carries the version the record was loaded with and must apply the
/// write only if the stored version still matches, bumping it on success.
/// This closes the read-check-then-write race between concurrent
/// registrations on the same event.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<EventRecord>>;

    async fn save(&self, event: &EventRecord) -> Result<SaveOutcome>;
}

/// Persistence for the student side of the bidirectional registration link
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<StudentRecord>>;

    /// Append an event to the student's registered-events list (idempotent)
    async fn add_registered_event(&self, student_id: Uuid, event_id: Uuid) -> Result<()>;

    /// Remove an event from the student's registered-events list
    async fn remove_registered_event(&self, student_id: Uuid, event_id: Uuid) -> Result<()>;
}

/// Persistence for attendance rows
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Upsert the (event, student) row to checked-in with the given
    /// timestamp. Calling it again just refreshes the timestamp.
    async fn mark_checked_in(
        &self,
        event_id: Uuid,
        student_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<AttendanceRecord>;

    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<AttendanceRecord>>;
}

/// Best-effort pub/sub fan-out to currently subscribed viewers
///
/// At-most-once, no persistence, no replay. Implementations must never
/// block or propagate failures into the calling operation; a publish that
/// finds no listeners is not an error.
pub trait Notifier: Send + Sync {
    fn publish(&self, topic: Topic, notice: Notice);
}

/// Fire-and-forget handoff of outbound email to the background dispatcher
///
/// Delivery success or failure is the dispatcher's concern (logged there);
/// it never rolls back or fails the primary operation.
pub trait Outbox: Send + Sync {
    fn deliver(&self, email: OutboundEmail);
}

/// Timestamp source, injected so tests can pin time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
