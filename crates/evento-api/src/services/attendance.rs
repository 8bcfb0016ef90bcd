// Attendance service: check-in marking and roster assembly

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use evento_contracts::{AttendanceResponse, AttendanceRoster, RosterEntry};
use evento_core::{EventoError, RegistrationEngine, Result};
use evento_storage::models::{AttendanceRow, EventRow, StudentRow};
use evento_storage::Database;

pub struct AttendanceService {
    engine: Arc<RegistrationEngine>,
    db: Arc<Database>,
}

impl AttendanceService {
    pub fn new(engine: Arc<RegistrationEngine>, db: Arc<Database>) -> Self {
        Self { engine, db }
    }

    pub async fn mark(&self, event_id: Uuid, student_id: Uuid) -> Result<AttendanceResponse> {
        let record = self.engine.mark_attendance(event_id, student_id).await?;
        Ok(AttendanceResponse {
            checked_in: record.checked_in,
            check_in_time: record.check_in_time,
        })
    }

    pub async fn roster(&self, event_id: Uuid) -> Result<AttendanceRoster> {
        let event = self
            .db
            .get_event(event_id)
            .await?
            .ok_or(EventoError::EventNotFound(event_id))?;
        let attendance = self.db.list_attendance_for_event(event_id).await?;

        let all_ids: Vec<Uuid> = event
            .participants
            .iter()
            .copied()
            .chain(attendance.iter().map(|row| row.student_id))
            .collect();
        let students: HashMap<Uuid, StudentRow> = self
            .db
            .list_students_by_ids(&all_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(assemble_roster(event, attendance, &students))
    }
}

/// Roster over the participant list in registration order. Participants
/// without an attendance row are reported absent; walk-in rows for
/// non-participants are appended at the end, sorted by student id.
fn assemble_roster(
    event: EventRow,
    attendance: Vec<AttendanceRow>,
    students: &HashMap<Uuid, StudentRow>,
) -> AttendanceRoster {
    let mut by_student: HashMap<Uuid, AttendanceRow> = attendance
        .into_iter()
        .map(|row| (row.student_id, row))
        .collect();

    let mut entries = Vec::with_capacity(event.participants.len());
    for student_id in &event.participants {
        let row = by_student.remove(student_id);
        entries.push(entry(*student_id, students, row.as_ref()));
    }
    // Remaining rows are walk-ins that never held a seat
    let mut walk_ins: Vec<_> = by_student.into_iter().collect();
    walk_ins.sort_by_key(|(id, _)| *id);
    for (student_id, row) in walk_ins {
        entries.push(entry(student_id, students, Some(&row)));
    }

    let total_attended = entries.iter().filter(|e| e.checked_in).count();
    AttendanceRoster {
        event_id: event.id,
        event_name: event.name,
        total_registered: event.participants.len(),
        total_attended,
        entries,
    }
}

fn entry(
    student_id: Uuid,
    students: &HashMap<Uuid, StudentRow>,
    row: Option<&AttendanceRow>,
) -> RosterEntry {
    let student = students.get(&student_id);
    RosterEntry {
        student_id,
        name: student.map(|s| s.name.clone()),
        register_no: student.map(|s| s.register_no.clone()),
        checked_in: row.map(|r| r.checked_in).unwrap_or(false),
        check_in_time: row.and_then(|r| r.check_in_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use evento_core::FeedbackEntry;
    use sqlx::types::Json;

    fn event_row(participants: Vec<Uuid>) -> EventRow {
        EventRow {
            id: Uuid::now_v7(),
            name: "Orientation Day".into(),
            description: "Welcome session".into(),
            date: Utc::now(),
            venue: "Main Auditorium".into(),
            club_name: None,
            organizer_id: Uuid::now_v7(),
            status: "approved".into(),
            max_participants: None,
            participants,
            waitlist: Vec::new(),
            feedback: Json(Vec::<FeedbackEntry>::new()),
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

    fn student_row(id: Uuid, name: &str, register_no: &str) -> StudentRow {
        StudentRow {
            id,
            name: name.into(),
            email: format!("{}@example.edu", name.to_lowercase()),
            register_no: register_no.into(),
            department: "CSE".into(),
            year: "2nd".into(),
            registered_events: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn checked_in_row(event_id: Uuid, student_id: Uuid) -> AttendanceRow {
        AttendanceRow {
            id: Uuid::now_v7(),
            event_id,
            student_id,
            checked_in: true,
            check_in_time: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn participants_keep_registration_order_and_absentees_show() {
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let event = event_row(vec![a, b]);
        let attendance = vec![checked_in_row(event.id, b)];
        let students = HashMap::from([
            (a, student_row(a, "Asha", "21CS001")),
            (b, student_row(b, "Bala", "21CS002")),
        ]);

        let roster = assemble_roster(event, attendance, &students);
        assert_eq!(roster.total_registered, 2);
        assert_eq!(roster.total_attended, 1);
        assert_eq!(roster.entries.len(), 2);
        assert_eq!(roster.entries[0].student_id, a);
        assert!(!roster.entries[0].checked_in);
        assert!(roster.entries[0].check_in_time.is_none());
        assert_eq!(roster.entries[1].student_id, b);
        assert!(roster.entries[1].checked_in);
        assert_eq!(roster.entries[0].name.as_deref(), Some("Asha"));
        assert_eq!(roster.entries[1].register_no.as_deref(), Some("21CS002"));
    }

    #[test]
    fn walk_ins_append_after_participants_sorted_by_id() {
        let seated = Uuid::now_v7();
        let mut walk_in_ids = [Uuid::now_v7(), Uuid::now_v7()];
        walk_in_ids.sort();
        let event = event_row(vec![seated]);
        // Walk-ins arrive unsorted
        let attendance = vec![
            checked_in_row(event.id, walk_in_ids[1]),
            checked_in_row(event.id, seated),
            checked_in_row(event.id, walk_in_ids[0]),
        ];
        let students = HashMap::from([(seated, student_row(seated, "Asha", "21CS001"))]);

        let roster = assemble_roster(event, attendance, &students);
        assert_eq!(roster.total_registered, 1);
        assert_eq!(roster.total_attended, 3);
        let order: Vec<Uuid> = roster.entries.iter().map(|e| e.student_id).collect();
        assert_eq!(order, vec![seated, walk_in_ids[0], walk_in_ids[1]]);
    }

    #[test]
    fn unknown_student_rows_are_listed_without_names() {
        let a = Uuid::now_v7();
        let event = event_row(vec![a]);
        let roster = assemble_roster(event, Vec::new(), &HashMap::new());
        assert_eq!(roster.entries.len(), 1);
        assert!(roster.entries[0].name.is_none());
        assert!(roster.entries[0].register_no.is_none());
        assert!(!roster.entries[0].checked_in);
    }
}
