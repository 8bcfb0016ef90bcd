// Persistent in-app notification service

use std::sync::Arc;

use uuid::Uuid;

use evento_contracts::{Notification, NotificationKind};
use evento_core::{EventoError, Result};
use evento_storage::{models::NotificationRow, Database};

use super::event::{KIND_EVENT_UPDATE, KIND_FEEDBACK_REQUEST};

fn notification_dto(row: &NotificationRow) -> Notification {
    let kind = match row.kind.as_str() {
        KIND_FEEDBACK_REQUEST => NotificationKind::FeedbackRequest,
        KIND_EVENT_UPDATE => NotificationKind::EventUpdate,
        _ => NotificationKind::Generic,
    };
    Notification {
        id: row.id,
        recipient_id: row.recipient_id,
        message: row.message.clone(),
        kind,
        related_event_id: row.related_event_id,
        is_read: row.is_read,
        created_at: row.created_at,
    }
}

pub struct NotificationService {
    db: Arc<Database>,
}

impl NotificationService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Newest first
    pub async fn list_for(&self, recipient_id: Uuid) -> Result<Vec<Notification>> {
        let rows = self.db.list_notifications_for(recipient_id).await?;
        Ok(rows.iter().map(notification_dto).collect())
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<()> {
        if self.db.mark_notification_read(id).await? {
            Ok(())
        } else {
            Err(EventoError::NotificationNotFound(id))
        }
    }
}
