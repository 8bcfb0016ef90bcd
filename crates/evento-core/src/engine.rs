// Capacity/waitlist engine
//
// Owns the register / unregister / feedback / attendance state transitions
// on event records. Persistence goes through versioned saves: on a version
// conflict the whole read-check-write cycle is re-run, so a capacity limit
// can not be exceeded by two near-simultaneous registrations.
//
// Side effects (seat notices, emails) run after the state change and are
// fire-and-forget; their failure never reaches the caller.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{AttendanceRecord, EventRecord, FeedbackEntry};
use crate::email::templates;
use crate::error::{Conflict, EventoError, Result};
use crate::notice::{Notice, Topic};
use crate::traits::{AttendanceStore, Clock, EventStore, Notifier, Outbox, SaveOutcome, StudentStore};

/// Attempts before a persistently conflicting save is reported as internal
const SAVE_RETRIES: usize = 3;

/// Outcome of a registration attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Seat confirmed; the student is a participant
    Registered,
    /// Event at capacity; appended to the end of the waitlist
    Waitlisted,
}

/// Outcome of an unregistration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnregisterOutcome {
    /// Seat released; `promoted` names the waitlist head that took it, if any
    Unregistered { promoted: Option<Uuid> },
    /// The student was only waitlisted; no promotion runs
    RemovedFromWaitlist,
}

/// The registration engine, generic over its collaborators
pub struct RegistrationEngine {
    events: Arc<dyn EventStore>,
    students: Arc<dyn StudentStore>,
    attendance: Arc<dyn AttendanceStore>,
    notifier: Arc<dyn Notifier>,
    outbox: Arc<dyn Outbox>,
    clock: Arc<dyn Clock>,
}

impl RegistrationEngine {
    pub fn new(
        events: Arc<dyn EventStore>,
        students: Arc<dyn StudentStore>,
        attendance: Arc<dyn AttendanceStore>,
        notifier: Arc<dyn Notifier>,
        outbox: Arc<dyn Outbox>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            events,
            students,
            attendance,
            notifier,
            outbox,
            clock,
        }
    }

    /// Register a student: a free seat admits them outright, a full event
    /// appends them to the waitlist. Waitlisted students do NOT gain an
    /// entry in their registered-events list.
    pub async fn register(&self, event_id: Uuid, student_id: Uuid) -> Result<RegisterOutcome> {
        for _ in 0..SAVE_RETRIES {
            let mut event = self.load_event(event_id).await?;
            if event.is_participant(student_id) {
                return Err(Conflict::AlreadyRegistered.into());
            }
            if event.is_waitlisted(student_id) {
                return Err(Conflict::AlreadyWaitlisted.into());
            }
            let student = self
                .students
                .load(student_id)
                .await?
                .ok_or(EventoError::StudentNotFound(student_id))?;

            if event.is_full() {
                event.waitlist.push(student_id);
                if self.events.save(&event).await? == SaveOutcome::Conflict {
                    continue;
                }
                self.publish_seats(&event);
                self.outbox.deliver(templates::waitlist_joined(&student, &event));
                return Ok(RegisterOutcome::Waitlisted);
            }

            event.participants.push(student_id);
            if self.events.save(&event).await? == SaveOutcome::Conflict {
                continue;
            }
            if let Err(err) = self.students.add_registered_event(student_id, event_id).await {
                // Seat taken on the event but never mirrored on the student:
                // give the seat back and report the failure.
                self.release_seat(event_id, student_id).await;
                return Err(err);
            }

            self.publish_seats(&event);
            self.notifier
                .publish(Topic::Global, Notice::RegistrationActivity { event_id });
            self.outbox
                .deliver(templates::registration_confirmation(&student, &event));
            return Ok(RegisterOutcome::Registered);
        }
        Err(EventoError::internal(format!(
            "event {event_id} kept conflicting after {SAVE_RETRIES} save attempts"
        )))
    }

    /// Unregister a student. Leaving the waitlist is a plain removal;
    /// releasing a confirmed seat promotes exactly the waitlist head (FIFO),
    /// never more than one student per call.
    pub async fn unregister(&self, event_id: Uuid, student_id: Uuid) -> Result<UnregisterOutcome> {
        for _ in 0..SAVE_RETRIES {
            let mut event = self.load_event(event_id).await?;

            if let Some(pos) = event.waitlist.iter().position(|id| *id == student_id) {
                event.waitlist.remove(pos);
                if self.events.save(&event).await? == SaveOutcome::Conflict {
                    continue;
                }
                // Not contractually required here, but viewers holding a
                // waitlist position care about the count.
                self.publish_seats(&event);
                return Ok(UnregisterOutcome::RemovedFromWaitlist);
            }

            let Some(pos) = event.participants.iter().position(|id| *id == student_id) else {
                return Err(Conflict::NotRegistered.into());
            };
            event.participants.remove(pos);

            let promoted = if event.waitlist.is_empty() {
                None
            } else {
                let head = event.waitlist.remove(0);
                event.participants.push(head);
                Some(head)
            };

            if self.events.save(&event).await? == SaveOutcome::Conflict {
                continue;
            }

            if let Err(err) = self
                .students
                .remove_registered_event(student_id, event_id)
                .await
            {
                tracing::warn!(
                    %event_id, %student_id, error = %err,
                    "failed to drop event from student record; left for reconciliation"
                );
            }

            if let Some(promoted_id) = promoted {
                self.finish_promotion(&event, promoted_id).await;
            }

            self.publish_seats(&event);
            return Ok(UnregisterOutcome::Unregistered { promoted });
        }
        Err(EventoError::internal(format!(
            "event {event_id} kept conflicting after {SAVE_RETRIES} save attempts"
        )))
    }

    /// Record a feedback entry and recompute the average rating from the
    /// full list. Returns the new average.
    pub async fn submit_feedback(
        &self,
        event_id: Uuid,
        student_id: Uuid,
        rating: u8,
        comment: Option<String>,
    ) -> Result<f64> {
        if !(1..=5).contains(&rating) {
            return Err(EventoError::validation("rating must be between 1 and 5"));
        }

        for _ in 0..SAVE_RETRIES {
            let mut event = self.load_event(event_id).await?;
            if !event.is_participant(student_id) {
                return Err(EventoError::not_authorized(
                    "only participants can submit feedback",
                ));
            }
            if event.feedback.iter().any(|f| f.student_id == student_id) {
                return Err(Conflict::DuplicateFeedback.into());
            }

            event.feedback.push(FeedbackEntry {
                student_id,
                rating,
                comment: comment.clone(),
                submitted_at: self.clock.now(),
            });
            event.recompute_average_rating();
            let average = event.average_rating.unwrap_or_default();

            if self.events.save(&event).await? == SaveOutcome::Conflict {
                continue;
            }
            return Ok(average);
        }
        Err(EventoError::internal(format!(
            "event {event_id} kept conflicting after {SAVE_RETRIES} save attempts"
        )))
    }

    /// Idempotent check-in: the second call just refreshes the timestamp.
    pub async fn mark_attendance(
        &self,
        event_id: Uuid,
        student_id: Uuid,
    ) -> Result<AttendanceRecord> {
        // Only the event's existence gates attendance; walk-ins that never
        // registered still get a row.
        self.load_event(event_id).await?;
        self.attendance
            .mark_checked_in(event_id, student_id, self.clock.now())
            .await
    }

    async fn load_event(&self, event_id: Uuid) -> Result<EventRecord> {
        self.events
            .load(event_id)
            .await?
            .ok_or(EventoError::EventNotFound(event_id))
    }

    fn publish_seats(&self, event: &EventRecord) {
        self.notifier.publish(
            Topic::Event(event.id),
            Notice::SeatUpdate {
                event_id: event.id,
                participants_count: event.participants.len(),
                waitlist_count: event.waitlist.len(),
            },
        );
    }

    /// Compensating action for a registration whose student-side write
    /// failed: take the seat back so the two records stay consistent.
    async fn release_seat(&self, event_id: Uuid, student_id: Uuid) {
        for _ in 0..SAVE_RETRIES {
            let Ok(Some(mut event)) = self.events.load(event_id).await else {
                break;
            };
            event.participants.retain(|id| *id != student_id);
            match self.events.save(&event).await {
                Ok(SaveOutcome::Saved) => return,
                Ok(SaveOutcome::Conflict) => continue,
                Err(_) => break,
            }
        }
        tracing::error!(
            %event_id, %student_id,
            "compensation failed; participant recorded on event but not on student"
        );
    }

    async fn finish_promotion(&self, event: &EventRecord, promoted_id: Uuid) {
        if let Err(err) = self
            .students
            .add_registered_event(promoted_id, event.id)
            .await
        {
            tracing::warn!(
                event_id = %event.id, %promoted_id, error = %err,
                "promotion not mirrored on student record; left for reconciliation"
            );
        }
        match self.students.load(promoted_id).await {
            Ok(Some(promoted)) => self
                .outbox
                .deliver(templates::waitlist_promoted(&promoted, event)),
            Ok(None) => {
                tracing::warn!(%promoted_id, "promoted student record missing, skipping email");
            }
            Err(err) => {
                tracing::warn!(%promoted_id, error = %err, "could not load promoted student for email");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventStatus, StudentRecord};
    use crate::memory::{
        FixedClock, InMemoryAttendanceStore, InMemoryEventStore, InMemoryStudentStore,
        RecordingNotifier, RecordingOutbox,
    };
    use chrono::{TimeZone, Utc};

    struct Harness {
        engine: RegistrationEngine,
        events: InMemoryEventStore,
        students: InMemoryStudentStore,
        notifier: RecordingNotifier,
        outbox: RecordingOutbox,
    }

    fn harness() -> Harness {
        let events = InMemoryEventStore::new();
        let students = InMemoryStudentStore::new();
        let attendance = InMemoryAttendanceStore::new();
        let notifier = RecordingNotifier::new();
        let outbox = RecordingOutbox::new();
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap());
        let engine = RegistrationEngine::new(
            Arc::new(events.clone()),
            Arc::new(students.clone()),
            Arc::new(attendance),
            Arc::new(notifier.clone()),
            Arc::new(outbox.clone()),
            Arc::new(clock),
        );
        Harness {
            engine,
            events,
            students,
            notifier,
            outbox,
        }
    }

    fn make_event(max: Option<u32>) -> EventRecord {
        EventRecord {
            id: Uuid::now_v7(),
            name: "Robotics Workshop".into(),
            description: "Hands-on robotics session".into(),
            date: Utc.with_ymd_and_hms(2025, 4, 2, 9, 0, 0).unwrap(),
            venue: "Seminar Hall".into(),
            club_name: Some("Robotics Club".into()),
            organizer_id: Uuid::now_v7(),
            status: EventStatus::Approved,
            max_participants: max,
            participants: Vec::new(),
            waitlist: Vec::new(),
            feedback: Vec::new(),
            average_rating: None,
            feedback_requested: false,
            version: 1,
        }
    }

    fn make_student(name: &str) -> StudentRecord {
        StudentRecord {
            id: Uuid::now_v7(),
            name: name.into(),
            email: format!("{}@example.edu", name.to_lowercase()),
            register_no: format!("21CS{}", name.len()),
            department: "CSE".into(),
            year: "3rd".into(),
            registered_events: Vec::new(),
        }
    }

    async fn seeded(max: Option<u32>, students: &[&StudentRecord]) -> (Harness, EventRecord) {
        let h = harness();
        let event = make_event(max);
        h.events.seed(event.clone()).await;
        for s in students {
            h.students.seed((*s).clone()).await;
        }
        (h, event)
    }

    #[tokio::test]
    async fn register_with_free_seat_confirms() {
        let a = make_student("Asha");
        let (h, event) = seeded(Some(2), &[&a]).await;

        let outcome = h.engine.register(event.id, a.id).await.unwrap();
        assert_eq!(outcome, RegisterOutcome::Registered);

        let stored = h.events.snapshot(event.id).await.unwrap();
        assert_eq!(stored.participants, vec![a.id]);
        assert!(stored.waitlist.is_empty());
        assert_eq!(
            h.students.snapshot(a.id).await.unwrap().registered_events,
            vec![event.id]
        );
    }

    #[tokio::test]
    async fn register_unknown_event_is_not_found() {
        let h = harness();
        let err = h.engine.register(Uuid::now_v7(), Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, EventoError::EventNotFound(_)));
    }

    #[tokio::test]
    async fn double_registration_conflicts_and_mutates_nothing() {
        let a = make_student("Asha");
        let (h, event) = seeded(None, &[&a]).await;

        h.engine.register(event.id, a.id).await.unwrap();
        let err = h.engine.register(event.id, a.id).await.unwrap_err();
        assert!(matches!(
            err,
            EventoError::Conflict(Conflict::AlreadyRegistered)
        ));

        let stored = h.events.snapshot(event.id).await.unwrap();
        assert_eq!(stored.participants, vec![a.id]);
        assert_eq!(
            h.students.snapshot(a.id).await.unwrap().registered_events,
            vec![event.id]
        );
    }

    #[tokio::test]
    async fn full_event_waitlists_in_fifo_order() {
        let a = make_student("Asha");
        let b = make_student("Bala");
        let c = make_student("Chitra");
        let (h, event) = seeded(Some(1), &[&a, &b, &c]).await;

        assert_eq!(
            h.engine.register(event.id, a.id).await.unwrap(),
            RegisterOutcome::Registered
        );
        assert_eq!(
            h.engine.register(event.id, b.id).await.unwrap(),
            RegisterOutcome::Waitlisted
        );
        assert_eq!(
            h.engine.register(event.id, c.id).await.unwrap(),
            RegisterOutcome::Waitlisted
        );

        let stored = h.events.snapshot(event.id).await.unwrap();
        assert_eq!(stored.participants, vec![a.id]);
        assert_eq!(stored.waitlist, vec![b.id, c.id]);
        // Waitlisted students never gain a registered-events entry.
        assert!(h.students.snapshot(b.id).await.unwrap().registered_events.is_empty());
    }

    #[tokio::test]
    async fn waitlisted_student_registering_again_conflicts() {
        let a = make_student("Asha");
        let b = make_student("Bala");
        let (h, event) = seeded(Some(1), &[&a, &b]).await;

        h.engine.register(event.id, a.id).await.unwrap();
        h.engine.register(event.id, b.id).await.unwrap();
        let err = h.engine.register(event.id, b.id).await.unwrap_err();
        assert!(matches!(
            err,
            EventoError::Conflict(Conflict::AlreadyWaitlisted)
        ));
    }

    #[tokio::test]
    async fn capacity_never_exceeded_over_a_mixed_sequence() {
        let students: Vec<StudentRecord> = (0..6)
            .map(|i| make_student(&format!("Student{i}")))
            .collect();
        let refs: Vec<&StudentRecord> = students.iter().collect();
        let (h, event) = seeded(Some(2), &refs).await;

        for s in &students {
            let _ = h.engine.register(event.id, s.id).await.unwrap();
        }
        h.engine.unregister(event.id, students[0].id).await.unwrap();
        let _ = h.engine.register(event.id, students[0].id).await.unwrap();
        h.engine.unregister(event.id, students[1].id).await.unwrap();

        let stored = h.events.snapshot(event.id).await.unwrap();
        assert!(stored.participants.len() <= 2);
        for id in &stored.participants {
            assert!(!stored.waitlist.contains(id));
        }
        let mut all = stored.participants.clone();
        all.extend(&stored.waitlist);
        let before = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), before, "no identity may appear twice");
    }

    #[tokio::test]
    async fn unregister_promotes_exactly_the_waitlist_head() {
        let a = make_student("Asha");
        let b = make_student("Bala");
        let c = make_student("Chitra");
        let (h, event) = seeded(Some(1), &[&a, &b, &c]).await;

        h.engine.register(event.id, a.id).await.unwrap();
        h.engine.register(event.id, b.id).await.unwrap();
        h.engine.register(event.id, c.id).await.unwrap();

        let outcome = h.engine.unregister(event.id, a.id).await.unwrap();
        assert_eq!(
            outcome,
            UnregisterOutcome::Unregistered {
                promoted: Some(b.id)
            }
        );

        let stored = h.events.snapshot(event.id).await.unwrap();
        assert_eq!(stored.participants, vec![b.id]);
        assert_eq!(stored.waitlist, vec![c.id]);
        assert_eq!(
            h.students.snapshot(b.id).await.unwrap().registered_events,
            vec![event.id]
        );
        assert!(h.students.snapshot(a.id).await.unwrap().registered_events.is_empty());
    }

    #[tokio::test]
    async fn single_seat_scenario_end_to_end() {
        // max=1: A registers, B waitlists, A leaves, B owns the seat.
        let a = make_student("Asha");
        let b = make_student("Bala");
        let (h, event) = seeded(Some(1), &[&a, &b]).await;

        assert_eq!(
            h.engine.register(event.id, a.id).await.unwrap(),
            RegisterOutcome::Registered
        );
        assert_eq!(
            h.engine.register(event.id, b.id).await.unwrap(),
            RegisterOutcome::Waitlisted
        );
        assert_eq!(
            h.engine.unregister(event.id, a.id).await.unwrap(),
            UnregisterOutcome::Unregistered {
                promoted: Some(b.id)
            }
        );

        let stored = h.events.snapshot(event.id).await.unwrap();
        assert_eq!(stored.participants, vec![b.id]);
        assert!(stored.waitlist.is_empty());
    }

    #[tokio::test]
    async fn waitlist_member_unregisters_without_promotion() {
        let a = make_student("Asha");
        let b = make_student("Bala");
        let c = make_student("Chitra");
        let (h, event) = seeded(Some(1), &[&a, &b, &c]).await;

        h.engine.register(event.id, a.id).await.unwrap();
        h.engine.register(event.id, b.id).await.unwrap();
        h.engine.register(event.id, c.id).await.unwrap();

        let outcome = h.engine.unregister(event.id, b.id).await.unwrap();
        assert_eq!(outcome, UnregisterOutcome::RemovedFromWaitlist);

        let stored = h.events.snapshot(event.id).await.unwrap();
        assert_eq!(stored.participants, vec![a.id]);
        assert_eq!(stored.waitlist, vec![c.id]);
        // No promotion mail went out for a waitlist removal.
        assert!(!h
            .outbox
            .emails()
            .iter()
            .any(|m| m.subject.contains("Seat Confirmed")));
    }

    #[tokio::test]
    async fn unregister_when_not_involved_conflicts() {
        let a = make_student("Asha");
        let (h, event) = seeded(None, &[&a]).await;
        let err = h.engine.unregister(event.id, a.id).await.unwrap_err();
        assert!(matches!(err, EventoError::Conflict(Conflict::NotRegistered)));
    }

    #[tokio::test]
    async fn unlimited_event_never_waitlists() {
        let students: Vec<StudentRecord> = (0..25)
            .map(|i| make_student(&format!("Student{i}")))
            .collect();
        let refs: Vec<&StudentRecord> = students.iter().collect();
        let (h, event) = seeded(None, &refs).await;

        for s in &students {
            assert_eq!(
                h.engine.register(event.id, s.id).await.unwrap(),
                RegisterOutcome::Registered
            );
        }
        let stored = h.events.snapshot(event.id).await.unwrap();
        assert_eq!(stored.participants.len(), 25);
        assert!(stored.waitlist.is_empty());
    }

    #[tokio::test]
    async fn seat_notices_carry_current_counts() {
        let a = make_student("Asha");
        let b = make_student("Bala");
        let (h, event) = seeded(Some(1), &[&a, &b]).await;

        h.engine.register(event.id, a.id).await.unwrap();
        h.engine.register(event.id, b.id).await.unwrap();

        let published = h.notifier.published();
        let seat_updates: Vec<&Notice> = published
            .iter()
            .filter(|(topic, _)| *topic == Topic::Event(event.id))
            .map(|(_, n)| n)
            .collect();
        assert_eq!(
            seat_updates.last().unwrap(),
            &&Notice::SeatUpdate {
                event_id: event.id,
                participants_count: 1,
                waitlist_count: 1,
            }
        );
        // The outright registration also pinged the global dashboard topic.
        assert!(published
            .iter()
            .any(|(topic, n)| *topic == Topic::Global
                && matches!(n, Notice::RegistrationActivity { event_id } if *event_id == event.id)));
    }

    #[tokio::test]
    async fn emails_match_outcomes() {
        let a = make_student("Asha");
        let b = make_student("Bala");
        let (h, event) = seeded(Some(1), &[&a, &b]).await;

        h.engine.register(event.id, a.id).await.unwrap();
        h.engine.register(event.id, b.id).await.unwrap();
        h.engine.unregister(event.id, a.id).await.unwrap();

        let subjects: Vec<String> = h.outbox.emails().iter().map(|m| m.subject.clone()).collect();
        assert_eq!(subjects.len(), 3);
        assert!(subjects[0].starts_with("Registration Confirmed"));
        assert!(subjects[1].starts_with("Waitlisted"));
        assert!(subjects[2].starts_with("Seat Confirmed"));

        let emails = h.outbox.emails();
        assert_eq!(emails[2].to, b.email);
    }

    #[tokio::test]
    async fn feedback_records_and_averages() {
        let a = make_student("Asha");
        let b = make_student("Bala");
        let (h, event) = seeded(None, &[&a, &b]).await;
        h.engine.register(event.id, a.id).await.unwrap();
        h.engine.register(event.id, b.id).await.unwrap();

        h.engine
            .submit_feedback(event.id, a.id, 3, Some("Good session".into()))
            .await
            .unwrap();
        let average = h.engine.submit_feedback(event.id, b.id, 5, None).await.unwrap();
        assert_eq!(average, 4.0);

        let stored = h.events.snapshot(event.id).await.unwrap();
        assert_eq!(stored.feedback.len(), 2);
        assert_eq!(stored.average_rating, Some(4.0));
    }

    #[tokio::test]
    async fn duplicate_feedback_rejected_and_average_unchanged() {
        let a = make_student("Asha");
        let (h, event) = seeded(None, &[&a]).await;
        h.engine.register(event.id, a.id).await.unwrap();

        h.engine.submit_feedback(event.id, a.id, 4, None).await.unwrap();
        let err = h
            .engine
            .submit_feedback(event.id, a.id, 1, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EventoError::Conflict(Conflict::DuplicateFeedback)
        ));

        let stored = h.events.snapshot(event.id).await.unwrap();
        assert_eq!(stored.feedback.len(), 1);
        assert_eq!(stored.average_rating, Some(4.0));
    }

    #[tokio::test]
    async fn waitlisted_student_cannot_submit_feedback() {
        let a = make_student("Asha");
        let b = make_student("Bala");
        let (h, event) = seeded(Some(1), &[&a, &b]).await;
        h.engine.register(event.id, a.id).await.unwrap();
        h.engine.register(event.id, b.id).await.unwrap();

        let err = h
            .engine
            .submit_feedback(event.id, b.id, 5, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EventoError::NotAuthorized(_)));
    }

    #[tokio::test]
    async fn out_of_range_rating_is_rejected_before_any_lookup() {
        let h = harness();
        for rating in [0, 6] {
            let err = h
                .engine
                .submit_feedback(Uuid::now_v7(), Uuid::now_v7(), rating, None)
                .await
                .unwrap_err();
            assert!(matches!(err, EventoError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn attendance_mark_is_idempotent() {
        let a = make_student("Asha");
        let (h, event) = seeded(None, &[&a]).await;

        let first = h.engine.mark_attendance(event.id, a.id).await.unwrap();
        assert!(first.checked_in);
        assert!(first.check_in_time.is_some());

        let second = h.engine.mark_attendance(event.id, a.id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn attendance_for_unknown_event_is_not_found() {
        let h = harness();
        let err = h
            .engine
            .mark_attendance(Uuid::now_v7(), Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, EventoError::EventNotFound(_)));
    }

    /// Event store that reports a conflict for the first `n` saves, then
    /// delegates. Stands in for a concurrent writer sneaking in between
    /// the engine's load and save.
    struct ConflictingEventStore {
        inner: InMemoryEventStore,
        remaining: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl EventStore for ConflictingEventStore {
        async fn load(&self, id: Uuid) -> crate::error::Result<Option<EventRecord>> {
            self.inner.load(id).await
        }

        async fn save(&self, event: &EventRecord) -> crate::error::Result<SaveOutcome> {
            use std::sync::atomic::Ordering;
            if self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Ok(SaveOutcome::Conflict);
            }
            self.inner.save(event).await
        }
    }

    fn conflicting_harness(conflicts: usize) -> (RegistrationEngine, InMemoryEventStore, InMemoryStudentStore) {
        let inner = InMemoryEventStore::new();
        let students = InMemoryStudentStore::new();
        let store = ConflictingEventStore {
            inner: inner.clone(),
            remaining: std::sync::atomic::AtomicUsize::new(conflicts),
        };
        let engine = RegistrationEngine::new(
            Arc::new(store),
            Arc::new(students.clone()),
            Arc::new(InMemoryAttendanceStore::new()),
            Arc::new(crate::memory::NullNotifier),
            Arc::new(crate::memory::NullOutbox),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap())),
        );
        (engine, inner, students)
    }

    #[tokio::test]
    async fn conflicting_save_retries_and_succeeds() {
        let a = make_student("Asha");
        let event = make_event(Some(5));
        let (engine, events, students) = conflicting_harness(1);
        events.seed(event.clone()).await;
        students.seed(a.clone()).await;

        let outcome = engine.register(event.id, a.id).await.unwrap();
        assert_eq!(outcome, RegisterOutcome::Registered);
        assert_eq!(events.snapshot(event.id).await.unwrap().participants, vec![a.id]);
    }

    #[tokio::test]
    async fn persistent_conflicts_surface_as_internal() {
        let a = make_student("Asha");
        let event = make_event(Some(5));
        let (engine, events, students) = conflicting_harness(usize::MAX);
        events.seed(event.clone()).await;
        students.seed(a.clone()).await;

        let err = engine.register(event.id, a.id).await.unwrap_err();
        assert!(matches!(err, EventoError::Internal(_)));
        // Nothing was applied.
        assert!(events.snapshot(event.id).await.unwrap().participants.is_empty());
    }
}
