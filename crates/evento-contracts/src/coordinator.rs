// Coordinator DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Coordinator {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: String,
    pub club_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCoordinatorRequest {
    pub name: String,
    pub email: String,
    pub department: String,
    pub club_name: Option<String>,
}
