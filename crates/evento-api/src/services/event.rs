// Event lifecycle service: CRUD, approval, participant mailings

use std::sync::Arc;

use uuid::Uuid;

use evento_contracts::{
    CreateEventRequest, Event, FeedbackList, NotifyParticipantsResponse, UpdateEventRequest,
};
use evento_core::email::templates;
use evento_core::{
    Conflict, EventStatus, EventoError, Notice, Notifier, Outbox, Result, SaveOutcome, Topic,
};
use evento_storage::{
    models::{CreateEvent, CreateNotification, EventRow, UpdateEventDetails},
    Database,
};

/// Attempts before a persistently conflicting flag save is reported as internal
const SAVE_RETRIES: usize = 3;

pub(crate) const KIND_FEEDBACK_REQUEST: &str = "FEEDBACK_REQUEST";
pub(crate) const KIND_EVENT_UPDATE: &str = "EVENT_UPDATE";

/// Public view of an event row, seat counts included
pub(crate) fn event_dto(row: &EventRow) -> Event {
    let record = row.to_record();
    Event {
        id: row.id,
        name: row.name.clone(),
        description: row.description.clone(),
        date: row.date,
        venue: row.venue.clone(),
        club_name: row.club_name.clone(),
        organizer_id: row.organizer_id,
        status: record.status.into(),
        max_participants: record.max_participants,
        participants_count: row.participants.len(),
        waitlist_count: row.waitlist.len(),
        participants: row.participants.clone(),
        waitlist: row.waitlist.clone(),
        average_rating: row.average_rating,
        feedback_requested: row.feedback_requested,
        approved_by: row.approved_by,
        approved_at: row.approved_at,
        rejection_reason: row.rejection_reason.clone(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub struct EventService {
    db: Arc<Database>,
    notifier: Arc<dyn Notifier>,
    outbox: Arc<dyn Outbox>,
}

impl EventService {
    pub fn new(db: Arc<Database>, notifier: Arc<dyn Notifier>, outbox: Arc<dyn Outbox>) -> Self {
        Self {
            db,
            notifier,
            outbox,
        }
    }

    /// Create an event in `pending` and announce it for approval
    pub async fn create(&self, req: CreateEventRequest) -> Result<Event> {
        if req.name.trim().is_empty() {
            return Err(EventoError::validation("event name must not be empty"));
        }
        self.db
            .get_coordinator(req.organizer_id)
            .await?
            .ok_or(EventoError::CoordinatorNotFound(req.organizer_id))?;

        let row = self
            .db
            .create_event(CreateEvent {
                name: req.name,
                description: req.description,
                date: req.date,
                venue: req.venue,
                club_name: req.club_name,
                organizer_id: req.organizer_id,
                max_participants: req.max_participants.map(|n| n as i32),
            })
            .await?;

        self.notifier.publish(
            Topic::Global,
            Notice::NewEvent {
                event_id: row.id,
                name: row.name.clone(),
            },
        );
        Ok(event_dto(&row))
    }

    pub async fn get(&self, id: Uuid) -> Result<Event> {
        let row = self.load(id).await?;
        Ok(event_dto(&row))
    }

    /// List by lifecycle status; public listings default to approved
    pub async fn list(&self, status: Option<EventStatus>) -> Result<Vec<Event>> {
        let status = status.unwrap_or(EventStatus::Approved);
        let rows = self.db.list_events_by_status(status.as_str()).await?;
        Ok(rows.iter().map(event_dto).collect())
    }

    pub async fn list_by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Event>> {
        let rows = self.db.list_events_by_organizer(organizer_id).await?;
        Ok(rows.iter().map(event_dto).collect())
    }

    /// Edit event details. With `enforce_owner` the request must name the
    /// organizer; the admin route passes false and skips the check.
    /// Participants get an email when date, venue, or description moved.
    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateEventRequest,
        enforce_owner: bool,
    ) -> Result<Event> {
        let existing = self.load(id).await?;
        if enforce_owner {
            let requested_by = req
                .requested_by
                .ok_or_else(|| EventoError::validation("requested_by is required"))?;
            if requested_by != existing.organizer_id {
                return Err(EventoError::not_authorized(
                    "only the organizer can edit this event",
                ));
            }
        }

        let changes = describe_changes(&existing, &req);

        let row = self
            .db
            .update_event_details(
                id,
                UpdateEventDetails {
                    name: req.name,
                    description: req.description,
                    date: req.date,
                    venue: req.venue,
                    club_name: req.club_name,
                    max_participants: req.max_participants.map(|n| n as i32),
                },
            )
            .await?
            .ok_or(EventoError::EventNotFound(id))?;

        if !changes.is_empty() {
            self.fan_out_update(&row, &changes).await?;
        }
        Ok(event_dto(&row))
    }

    pub async fn approve(&self, id: Uuid, approved_by: Uuid) -> Result<Event> {
        let row = self
            .db
            .approve_event(id, approved_by)
            .await?
            .ok_or(EventoError::EventNotFound(id))?;
        Ok(event_dto(&row))
    }

    /// Reject with a reason and tell the organizer why
    pub async fn reject(&self, id: Uuid, reason: Option<String>) -> Result<Event> {
        let reason = reason.unwrap_or_else(|| "No reason provided".to_string());
        let row = self
            .db
            .reject_event(id, &reason)
            .await?
            .ok_or(EventoError::EventNotFound(id))?;

        if let Some(organizer) = self.db.get_coordinator(row.organizer_id).await? {
            self.outbox.deliver(templates::event_rejected(
                &organizer.name,
                &organizer.email,
                &row.name,
                &reason,
            ));
        }
        Ok(event_dto(&row))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self.db.delete_event(id).await? {
            Ok(())
        } else {
            Err(EventoError::EventNotFound(id))
        }
    }

    /// Enqueue a reminder email to every current participant
    pub async fn notify_participants(&self, id: Uuid) -> Result<NotifyParticipantsResponse> {
        let row = self.load(id).await?;
        let record = row.to_record();
        let students = self.db.list_students_by_ids(&row.participants).await?;
        for student in &students {
            self.outbox
                .deliver(templates::event_reminder(&student.to_record(), &record));
        }
        Ok(NotifyParticipantsResponse {
            enqueued: students.len(),
            total_participants: row.participants.len(),
        })
    }

    /// One-shot feedback solicitation: flips `feedback_requested` under the
    /// version check, then emails participants and leaves them a
    /// persistent notification.
    pub async fn request_feedback(&self, id: Uuid, requested_by: Uuid) -> Result<Event> {
        for _ in 0..SAVE_RETRIES {
            let row = self.load(id).await?;
            if requested_by != row.organizer_id {
                return Err(EventoError::not_authorized(
                    "only the organizer can request feedback",
                ));
            }
            let mut record = row.to_record();
            if record.feedback_requested {
                return Err(Conflict::FeedbackAlreadyRequested.into());
            }
            record.feedback_requested = true;
            if self.db.save_event_state(&record).await? == SaveOutcome::Conflict {
                continue;
            }

            let students = self.db.list_students_by_ids(&row.participants).await?;
            let mut notifications = Vec::with_capacity(students.len());
            for student in &students {
                self.outbox
                    .deliver(templates::feedback_request(&student.to_record(), &row.name));
                notifications.push(CreateNotification {
                    recipient_id: student.id,
                    message: format!("Please share your feedback for \"{}\"", row.name),
                    kind: KIND_FEEDBACK_REQUEST.to_string(),
                    related_event_id: Some(row.id),
                });
            }
            self.db.create_notifications(notifications).await?;

            self.notifier.publish(
                Topic::Global,
                Notice::FeedbackRequested {
                    event_id: row.id,
                    name: row.name.clone(),
                },
            );
            let refreshed = self.load(id).await?;
            return Ok(event_dto(&refreshed));
        }
        Err(EventoError::internal(format!(
            "event {id} kept conflicting after {SAVE_RETRIES} save attempts"
        )))
    }

    pub async fn feedback(&self, id: Uuid) -> Result<FeedbackList> {
        let row = self.load(id).await?;
        Ok(FeedbackList {
            average_rating: row.average_rating,
            entries: row.feedback.0.iter().cloned().map(Into::into).collect(),
        })
    }

    async fn load(&self, id: Uuid) -> Result<EventRow> {
        self.db
            .get_event(id)
            .await?
            .ok_or(EventoError::EventNotFound(id))
    }

    async fn fan_out_update(&self, row: &EventRow, changes: &[String]) -> Result<()> {
        let students = self.db.list_students_by_ids(&row.participants).await?;
        let mut notifications = Vec::with_capacity(students.len());
        for student in &students {
            self.outbox.deliver(templates::event_updated(
                &student.to_record(),
                &row.name,
                changes,
            ));
            notifications.push(CreateNotification {
                recipient_id: student.id,
                message: format!("\"{}\" was updated: {}", row.name, changes.join(", ")),
                kind: KIND_EVENT_UPDATE.to_string(),
                related_event_id: Some(row.id),
            });
        }
        self.db.create_notifications(notifications).await?;
        self.notifier
            .publish(Topic::Global, Notice::EventUpdated { event_id: row.id });
        Ok(())
    }
}

/// Human-readable descriptions of the changes participants care about
/// (date, venue, description). Name/club edits do not trigger mailings.
fn describe_changes(existing: &EventRow, req: &UpdateEventRequest) -> Vec<String> {
    let mut changes = Vec::new();
    if let Some(date) = req.date {
        if date != existing.date {
            changes.push(format!("Date changed to {}", date.format("%d %b %Y, %H:%M")));
        }
    }
    if let Some(venue) = &req.venue {
        if *venue != existing.venue {
            changes.push(format!("Venue changed to {venue}"));
        }
    }
    if let Some(description) = &req.description {
        if *description != existing.description {
            changes.push("Description updated".to_string());
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use evento_core::FeedbackEntry;
    use sqlx::types::Json;

    fn row() -> EventRow {
        EventRow {
            id: Uuid::now_v7(),
            name: "Robotics Workshop".into(),
            description: "Hands-on robotics".into(),
            date: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            venue: "Lab 4".into(),
            club_name: None,
            organizer_id: Uuid::now_v7(),
            status: "approved".into(),
            max_participants: Some(30),
            participants: vec![Uuid::now_v7()],
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

    #[test]
    fn unchanged_fields_produce_no_change_lines() {
        let existing = row();
        let req = UpdateEventRequest {
            venue: Some("Lab 4".into()),
            date: Some(existing.date),
            ..Default::default()
        };
        assert!(describe_changes(&existing, &req).is_empty());
    }

    #[test]
    fn moved_date_and_venue_are_described() {
        let existing = row();
        let req = UpdateEventRequest {
            date: Some(existing.date + Duration::days(2)),
            venue: Some("Main Auditorium".into()),
            name: Some("Renamed".into()),
            ..Default::default()
        };
        let changes = describe_changes(&existing, &req);
        assert_eq!(changes.len(), 2);
        assert!(changes[0].starts_with("Date changed"));
        assert_eq!(changes[1], "Venue changed to Main Auditorium");
    }

    #[test]
    fn dto_exposes_seat_counts() {
        let mut r = row();
        r.waitlist = vec![Uuid::now_v7(), Uuid::now_v7()];
        let dto = event_dto(&r);
        assert_eq!(dto.participants_count, 1);
        assert_eq!(dto.waitlist_count, 2);
    }
}
