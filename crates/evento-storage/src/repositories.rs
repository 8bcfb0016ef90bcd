// Repository layer for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use evento_core::{EventRecord, SaveOutcome};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;

const EVENT_COLUMNS: &str = "id, name, description, date, venue, club_name, organizer_id, status, \
     max_participants, participants, waitlist, feedback, average_rating, feedback_requested, \
     approved_by, approved_at, rejection_reason, version, created_at, updated_at";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Apply pending migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEvent) -> Result<EventRow> {
        let query = format!(
            "INSERT INTO events (id, name, description, date, venue, club_name, organizer_id, max_participants, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending')
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(Uuid::now_v7())
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.date)
            .bind(&input.venue)
            .bind(&input.club_name)
            .bind(input.organizer_id)
            .bind(input.max_participants)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn list_events_by_status(&self, status: &str) -> Result<Vec<EventRow>> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE status = $1 ORDER BY date ASC"
        );
        let rows = sqlx::query_as::<_, EventRow>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn list_events_by_organizer(&self, organizer_id: Uuid) -> Result<Vec<EventRow>> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE organizer_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, EventRow>(&query)
            .bind(organizer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn list_events_by_ids(&self, ids: &[Uuid]) -> Result<Vec<EventRow>> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ANY($1) ORDER BY date ASC");
        let rows = sqlx::query_as::<_, EventRow>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn list_events_waitlisting(&self, student_id: Uuid) -> Result<Vec<EventRow>> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE $1 = ANY(waitlist) ORDER BY date ASC"
        );
        let rows = sqlx::query_as::<_, EventRow>(&query)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Approved events starting inside the window (reminder sweep)
    pub async fn list_events_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<EventRow>> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE status = 'approved' AND date >= $1 AND date < $2
             ORDER BY date ASC"
        );
        let rows = sqlx::query_as::<_, EventRow>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn update_event_details(
        &self,
        id: Uuid,
        input: UpdateEventDetails,
    ) -> Result<Option<EventRow>> {
        let query = format!(
            "UPDATE events
             SET
                 name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 date = COALESCE($4, date),
                 venue = COALESCE($5, venue),
                 club_name = COALESCE($6, club_name),
                 max_participants = COALESCE($7, max_participants),
                 version = version + 1,
                 updated_at = now()
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.date)
            .bind(&input.venue)
            .bind(&input.club_name)
            .bind(input.max_participants)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn approve_event(&self, id: Uuid, approved_by: Uuid) -> Result<Option<EventRow>> {
        let query = format!(
            "UPDATE events
             SET status = 'approved', approved_by = $2, approved_at = now(),
                 rejection_reason = NULL, version = version + 1, updated_at = now()
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .bind(approved_by)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn reject_event(&self, id: Uuid, reason: &str) -> Result<Option<EventRow>> {
        let query = format!(
            "UPDATE events
             SET status = 'rejected', rejection_reason = $2,
                 approved_by = NULL, approved_at = NULL,
                 version = version + 1, updated_at = now()
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .bind(reason)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Version-checked save of the engine-mutable state. The UPDATE applies
    /// only while the stored version still matches the one the record was
    /// loaded with; zero affected rows means a concurrent writer won.
    pub async fn save_event_state(&self, event: &EventRecord) -> Result<SaveOutcome> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET participants = $2, waitlist = $3, feedback = $4,
                average_rating = $5, feedback_requested = $6,
                version = version + 1, updated_at = now()
            WHERE id = $1 AND version = $7
            "#,
        )
        .bind(event.id)
        .bind(&event.participants)
        .bind(&event.waitlist)
        .bind(Json(&event.feedback))
        .bind(event.average_rating)
        .bind(event.feedback_requested)
        .bind(event.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            Ok(SaveOutcome::Saved)
        } else {
            Ok(SaveOutcome::Conflict)
        }
    }

    // ============================================
    // Students
    // ============================================

    pub async fn create_student(&self, input: CreateStudent) -> Result<StudentRow> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            INSERT INTO students (id, name, email, register_no, department, year)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, register_no, department, year, registered_events, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.register_no)
        .bind(&input.department)
        .bind(&input.year)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_student(&self, id: Uuid) -> Result<Option<StudentRow>> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, email, register_no, department, year, registered_events, created_at, updated_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_students(&self) -> Result<Vec<StudentRow>> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, email, register_no, department, year, registered_events, created_at, updated_at
            FROM students
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_students_by_ids(&self, ids: &[Uuid]) -> Result<Vec<StudentRow>> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, email, register_no, department, year, registered_events, created_at, updated_at
            FROM students
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn add_registered_event(&self, student_id: Uuid, event_id: Uuid) -> Result<bool> {
        // array_position guard keeps the append idempotent
        let result = sqlx::query(
            r#"
            UPDATE students
            SET registered_events = array_append(registered_events, $2), updated_at = now()
            WHERE id = $1 AND array_position(registered_events, $2) IS NULL
            "#,
        )
        .bind(student_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_registered_event(&self, student_id: Uuid, event_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET registered_events = array_remove(registered_events, $2), updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(student_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Coordinators
    // ============================================

    pub async fn create_coordinator(&self, input: CreateCoordinator) -> Result<CoordinatorRow> {
        let row = sqlx::query_as::<_, CoordinatorRow>(
            r#"
            INSERT INTO coordinators (id, name, email, department, club_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, department, club_name, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.department)
        .bind(&input.club_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_coordinator(&self, id: Uuid) -> Result<Option<CoordinatorRow>> {
        let row = sqlx::query_as::<_, CoordinatorRow>(
            r#"
            SELECT id, name, email, department, club_name, created_at, updated_at
            FROM coordinators
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_coordinators(&self) -> Result<Vec<CoordinatorRow>> {
        let rows = sqlx::query_as::<_, CoordinatorRow>(
            r#"
            SELECT id, name, email, department, club_name, created_at, updated_at
            FROM coordinators
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Attendance
    // ============================================

    pub async fn upsert_checked_in(
        &self,
        event_id: Uuid,
        student_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<AttendanceRow> {
        let row = sqlx::query_as::<_, AttendanceRow>(
            r#"
            INSERT INTO attendance (id, event_id, student_id, checked_in, check_in_time)
            VALUES ($1, $2, $3, TRUE, $4)
            ON CONFLICT (event_id, student_id)
            DO UPDATE SET checked_in = TRUE, check_in_time = $4, updated_at = now()
            RETURNING id, event_id, student_id, checked_in, check_in_time, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(event_id)
        .bind(student_id)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_attendance_for_event(&self, event_id: Uuid) -> Result<Vec<AttendanceRow>> {
        let rows = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT id, event_id, student_id, checked_in, check_in_time, created_at, updated_at
            FROM attendance
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Notifications
    // ============================================

    pub async fn create_notifications(
        &self,
        inputs: Vec<CreateNotification>,
    ) -> Result<Vec<NotificationRow>> {
        let mut rows = Vec::with_capacity(inputs.len());
        for input in inputs {
            let row = sqlx::query_as::<_, NotificationRow>(
                r#"
                INSERT INTO notifications (id, recipient_id, message, kind, related_event_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, recipient_id, message, kind, related_event_id, is_read, created_at
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(input.recipient_id)
            .bind(&input.message)
            .bind(&input.kind)
            .bind(input.related_event_id)
            .fetch_one(&self.pool)
            .await?;
            rows.push(row);
        }
        Ok(rows)
    }

    pub async fn list_notifications_for(&self, recipient_id: Uuid) -> Result<Vec<NotificationRow>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, recipient_id, message, kind, related_event_id, is_read, created_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Stats / analytics
    // ============================================

    pub async fn count_students(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_coordinators(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coordinators")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_events(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn total_registrations(&self) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(cardinality(participants)), 0)::BIGINT FROM events",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Event/registration/attendance counts for events dated in [from, to)
    pub async fn analytics_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<AnalyticsCounts> {
        let mut counts = AnalyticsCounts::default();

        let by_status: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM events WHERE date >= $1 AND date < $2 GROUP BY status",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        for (status, count) in by_status {
            counts.total_events += count;
            match status.as_str() {
                "approved" => counts.approved_events = count,
                "pending" => counts.pending_events = count,
                "rejected" => counts.rejected_events = count,
                _ => {}
            }
        }

        counts.total_registrations = sqlx::query_scalar(
            "SELECT COALESCE(SUM(cardinality(participants)), 0)::BIGINT
             FROM events WHERE date >= $1 AND date < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        counts.total_attendance = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance a
             JOIN events e ON e.id = a.event_id
             WHERE a.checked_in AND e.date >= $1 AND e.date < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}
