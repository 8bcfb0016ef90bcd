// Daily reminder sweep
//
// Finds approved events starting within the next 24 hours and enqueues a
// reminder email to each participant. Errors are logged and the sweep
// tries again next tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use evento_core::email::templates;
use evento_core::Outbox;
use evento_storage::Database;

const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

pub fn spawn_reminder_sweep(
    db: Arc<Database>,
    outbox: Arc<dyn Outbox>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(err) = sweep_once(&db, outbox.as_ref()).await {
                tracing::error!(error = %err, "reminder sweep failed");
            }
        }
    })
}

async fn sweep_once(db: &Database, outbox: &dyn Outbox) -> anyhow::Result<()> {
    let (from, to) = reminder_window(Utc::now());
    let events = db.list_events_starting_between(from, to).await?;
    for row in &events {
        let record = row.to_record();
        let students = db.list_students_by_ids(&row.participants).await?;
        for student in &students {
            outbox.deliver(templates::event_reminder(&student.to_record(), &record));
        }
        tracing::info!(
            event_id = %row.id,
            recipients = students.len(),
            "event reminders enqueued"
        );
    }
    Ok(())
}

/// [now, now + 24h): events already started are not reminded about
fn reminder_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (now, now + chrono::Duration::hours(24))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_spans_the_next_day() {
        let now = Utc.with_ymd_and_hms(2025, 5, 10, 8, 30, 0).unwrap();
        let (from, to) = reminder_window(now);
        assert_eq!(from, now);
        assert_eq!(to - from, chrono::Duration::hours(24));
    }
}
