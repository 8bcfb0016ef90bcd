// Database-backed implementations of the core store traits
//
// Thin adapters over `Database`: row <-> domain record conversion plus the
// versioned-save contract the engine relies on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use evento_core::{
    AttendanceRecord, AttendanceStore, EventRecord, EventStore, Result, SaveOutcome, StudentRecord,
    StudentStore,
};
use uuid::Uuid;

use crate::repositories::Database;

/// Event store backed by the events table
#[derive(Clone)]
pub struct DbEventStore {
    db: Database,
}

impl DbEventStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventStore for DbEventStore {
    async fn load(&self, id: Uuid) -> Result<Option<EventRecord>> {
        let row = self.db.get_event(id).await?;
        Ok(row.map(|r| r.to_record()))
    }

    async fn save(&self, event: &EventRecord) -> Result<SaveOutcome> {
        Ok(self.db.save_event_state(event).await?)
    }
}

/// Student store backed by the students table
#[derive(Clone)]
pub struct DbStudentStore {
    db: Database,
}

impl DbStudentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudentStore for DbStudentStore {
    async fn load(&self, id: Uuid) -> Result<Option<StudentRecord>> {
        let row = self.db.get_student(id).await?;
        Ok(row.map(|r| r.to_record()))
    }

    async fn add_registered_event(&self, student_id: Uuid, event_id: Uuid) -> Result<()> {
        self.db.add_registered_event(student_id, event_id).await?;
        Ok(())
    }

    async fn remove_registered_event(&self, student_id: Uuid, event_id: Uuid) -> Result<()> {
        self.db.remove_registered_event(student_id, event_id).await?;
        Ok(())
    }
}

/// Attendance store backed by the attendance table
#[derive(Clone)]
pub struct DbAttendanceStore {
    db: Database,
}

impl DbAttendanceStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttendanceStore for DbAttendanceStore {
    async fn mark_checked_in(
        &self,
        event_id: Uuid,
        student_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<AttendanceRecord> {
        let row = self.db.upsert_checked_in(event_id, student_id, at).await?;
        Ok(AttendanceRecord {
            event_id: row.event_id,
            student_id: row.student_id,
            checked_in: row.checked_in,
            check_in_time: row.check_in_time,
        })
    }

    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<AttendanceRecord>> {
        let rows = self.db.list_attendance_for_event(event_id).await?;
        Ok(rows
            .into_iter()
            .map(|row| AttendanceRecord {
                event_id: row.event_id,
                student_id: row.student_id,
                checked_in: row.checked_in,
                check_in_time: row.check_in_time,
            })
            .collect())
    }
}
