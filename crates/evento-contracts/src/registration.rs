// Registration / feedback request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub student_id: Uuid,
}

/// How a registration attempt resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RegisterOutcome {
    Registered,
    Waitlisted,
}

impl From<evento_core::RegisterOutcome> for RegisterOutcome {
    fn from(outcome: evento_core::RegisterOutcome) -> Self {
        match outcome {
            evento_core::RegisterOutcome::Registered => RegisterOutcome::Registered,
            evento_core::RegisterOutcome::Waitlisted => RegisterOutcome::Waitlisted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub outcome: RegisterOutcome,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UnregisterRequest {
    pub student_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnregisterOutcome {
    Unregistered,
    RemovedFromWaitlist,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnregisterResponse {
    pub outcome: UnregisterOutcome,
    /// Waitlist head moved into the freed seat, when a promotion ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted: Option<Uuid>,
}

impl From<evento_core::UnregisterOutcome> for UnregisterResponse {
    fn from(outcome: evento_core::UnregisterOutcome) -> Self {
        match outcome {
            evento_core::UnregisterOutcome::Unregistered { promoted } => UnregisterResponse {
                outcome: UnregisterOutcome::Unregistered,
                promoted,
            },
            evento_core::UnregisterOutcome::RemovedFromWaitlist => UnregisterResponse {
                outcome: UnregisterOutcome::RemovedFromWaitlist,
                promoted: None,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitFeedbackRequest {
    pub student_id: Uuid,
    /// 1-5
    pub rating: u8,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitFeedbackResponse {
    /// Always "recorded" on success
    pub outcome: String,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackEntry {
    pub student_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl From<evento_core::FeedbackEntry> for FeedbackEntry {
    fn from(entry: evento_core::FeedbackEntry) -> Self {
        FeedbackEntry {
            student_id: entry.student_id,
            rating: entry.rating,
            comment: entry.comment,
            submitted_at: entry.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackList {
    pub average_rating: Option<f64>,
    pub entries: Vec<FeedbackEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregister_response_skips_absent_promotion() {
        let response: UnregisterResponse =
            evento_core::UnregisterOutcome::RemovedFromWaitlist.into();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["outcome"], "removed_from_waitlist");
        assert!(json.get("promoted").is_none());
    }

    #[test]
    fn promotion_surfaces_in_response() {
        let promoted = Uuid::now_v7();
        let response: UnregisterResponse = evento_core::UnregisterOutcome::Unregistered {
            promoted: Some(promoted),
        }
        .into();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["outcome"], "unregistered");
        assert_eq!(json["promoted"], promoted.to_string());
    }
}
