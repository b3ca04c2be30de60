use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Decisions an HR user can record on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationDecision {
    Accepted,
    Rejected,
}

impl ApplicationDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationDecision::Accepted => "accepted",
            ApplicationDecision::Rejected => "rejected",
        }
    }
}
