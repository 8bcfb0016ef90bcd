// In-memory implementations for examples and testing
//
// These keep all state in process memory, which is enough for engine unit
// tests and quick prototyping. The event store enforces the same versioned
// save contract as the Postgres implementation.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use uuid::Uuid;

use async_trait::async_trait;

use crate::domain::{AttendanceRecord, EventRecord, StudentRecord};
use crate::email::OutboundEmail;
use crate::error::{EventoError, Result};
use crate::notice::{Notice, Topic};
use crate::traits::{
    AttendanceStore, Clock, EventStore, Notifier, Outbox, SaveOutcome, StudentStore,
};

// ============================================================================
// InMemoryEventStore
// ============================================================================

/// In-memory event store with versioned saves
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<HashMap<Uuid, EventRecord>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an event (useful for testing)
    pub async fn seed(&self, event: EventRecord) {
        self.events.write().await.insert(event.id, event);
    }

    /// Snapshot of the stored record
    pub async fn snapshot(&self, id: Uuid) -> Option<EventRecord> {
        self.events.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn load(&self, id: Uuid) -> Result<Option<EventRecord>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn save(&self, event: &EventRecord) -> Result<SaveOutcome> {
        let mut events = self.events.write().await;
        let Some(stored) = events.get_mut(&event.id) else {
            return Err(EventoError::EventNotFound(event.id));
        };
        if stored.version != event.version {
            return Ok(SaveOutcome::Conflict);
        }
        let mut updated = event.clone();
        updated.version += 1;
        *stored = updated;
        Ok(SaveOutcome::Saved)
    }
}

// ============================================================================
// InMemoryStudentStore
// ============================================================================

/// In-memory student store
#[derive(Debug, Default, Clone)]
pub struct InMemoryStudentStore {
    students: Arc<RwLock<HashMap<Uuid, StudentRecord>>>,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, student: StudentRecord) {
        self.students.write().await.insert(student.id, student);
    }

    pub async fn snapshot(&self, id: Uuid) -> Option<StudentRecord> {
        self.students.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn load(&self, id: Uuid) -> Result<Option<StudentRecord>> {
        Ok(self.students.read().await.get(&id).cloned())
    }

    async fn add_registered_event(&self, student_id: Uuid, event_id: Uuid) -> Result<()> {
        let mut students = self.students.write().await;
        let student = students
            .get_mut(&student_id)
            .ok_or(EventoError::StudentNotFound(student_id))?;
        if !student.registered_events.contains(&event_id) {
            student.registered_events.push(event_id);
        }
        Ok(())
    }

    async fn remove_registered_event(&self, student_id: Uuid, event_id: Uuid) -> Result<()> {
        let mut students = self.students.write().await;
        let student = students
            .get_mut(&student_id)
            .ok_or(EventoError::StudentNotFound(student_id))?;
        student.registered_events.retain(|id| *id != event_id);
        Ok(())
    }
}

// ============================================================================
// InMemoryAttendanceStore
// ============================================================================

/// In-memory attendance store keyed by (event, student)
#[derive(Debug, Default, Clone)]
pub struct InMemoryAttendanceStore {
    records: Arc<RwLock<HashMap<(Uuid, Uuid), AttendanceRecord>>>,
}

impl InMemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceStore for InMemoryAttendanceStore {
    async fn mark_checked_in(
        &self,
        event_id: Uuid,
        student_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<AttendanceRecord> {
        let mut records = self.records.write().await;
        let record = records
            .entry((event_id, student_id))
            .or_insert_with(|| AttendanceRecord {
                event_id,
                student_id,
                checked_in: false,
                check_in_time: None,
            });
        record.checked_in = true;
        record.check_in_time = Some(at);
        Ok(record.clone())
    }

    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<AttendanceRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Side-effect collaborators
// ============================================================================

/// Notifier that records every publish (for asserting on side effects)
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    published: Arc<Mutex<Vec<(Topic, Notice)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<(Topic, Notice)> {
        self.published.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn publish(&self, topic: Topic, notice: Notice) {
        self.published.lock().unwrap().push((topic, notice));
    }
}

/// Notifier that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn publish(&self, _topic: Topic, _notice: Notice) {}
}

/// Outbox that records every delivered email
#[derive(Debug, Default, Clone)]
pub struct RecordingOutbox {
    emails: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl RecordingOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emails(&self) -> Vec<OutboundEmail> {
        self.emails.lock().unwrap().clone()
    }
}

impl Outbox for RecordingOutbox {
    fn deliver(&self, email: OutboundEmail) {
        self.emails.lock().unwrap().push(email);
    }
}

/// Outbox that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutbox;

impl Outbox for NullOutbox {
    fn deliver(&self, _email: OutboundEmail) {}
}

/// Clock pinned to a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
