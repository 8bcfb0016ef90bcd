// Error taxonomy shared by the engine and the HTTP layer

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, EventoError>;

/// Request/state conflicts: the stored state already satisfies or
/// contradicts what the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Conflict {
    #[error("already registered")]
    AlreadyRegistered,

    #[error("already on the waitlist")]
    AlreadyWaitlisted,

    #[error("not registered for this event")]
    NotRegistered,

    #[error("feedback already submitted")]
    DuplicateFeedback,

    #[error("feedback request already sent")]
    FeedbackAlreadyRequested,
}

/// Errors reported synchronously to callers. Side-effect failures (email,
/// broadcast) are logged by their owners and never reach this type.
#[derive(Debug, Error)]
pub enum EventoError {
    /// Event not found
    #[error("event not found: {0}")]
    EventNotFound(Uuid),

    /// Student not found
    #[error("student not found: {0}")]
    StudentNotFound(Uuid),

    /// Coordinator not found
    #[error("coordinator not found: {0}")]
    CoordinatorNotFound(Uuid),

    /// Notification not found
    #[error("notification not found: {0}")]
    NotificationNotFound(Uuid),

    /// State conflict (already registered, duplicate feedback, ...)
    #[error(transparent)]
    Conflict(#[from] Conflict),

    /// Role or ownership violation
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// Invalid input (rating out of range, missing required field)
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unexpected store/transport failure
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EventoError {
    /// Create a not-authorized error
    pub fn not_authorized(msg: impl Into<String>) -> Self {
        EventoError::NotAuthorized(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EventoError::Validation(msg.into())
    }

    /// Create an internal error from a message
    pub fn internal(msg: impl Into<String>) -> Self {
        EventoError::Internal(anyhow::anyhow!(msg.into()))
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            EventoError::EventNotFound(_)
            | EventoError::StudentNotFound(_)
            | EventoError::CoordinatorNotFound(_)
            | EventoError::NotificationNotFound(_) => "not_found",
            EventoError::Conflict(Conflict::AlreadyRegistered) => "already_registered",
            EventoError::Conflict(Conflict::AlreadyWaitlisted) => "already_waitlisted",
            EventoError::Conflict(Conflict::NotRegistered) => "not_registered",
            EventoError::Conflict(Conflict::DuplicateFeedback) => "duplicate_feedback",
            EventoError::Conflict(Conflict::FeedbackAlreadyRequested) => {
                "feedback_already_requested"
            }
            EventoError::NotAuthorized(_) => "not_authorized",
            EventoError::Validation(_) => "validation",
            EventoError::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_converts_into_error() {
        let err: EventoError = Conflict::AlreadyRegistered.into();
        assert_eq!(err.code(), "already_registered");
        assert_eq!(err.to_string(), "already registered");
    }

    #[test]
    fn not_found_codes_collapse() {
        let id = Uuid::now_v7();
        assert_eq!(EventoError::EventNotFound(id).code(), "not_found");
        assert_eq!(EventoError::StudentNotFound(id).code(), "not_found");
    }
}
