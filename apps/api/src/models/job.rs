use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub experience_level: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub work_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub availability: Option<String>,
    pub status: String,
    pub posted_by: Uuid,
    pub created_at: DateTime<Utc>,
}

pub const JOB_COLUMNS: &str = "id, title, description, location, experience_level, \
     required_skills, work_type, salary_min, salary_max, availability, status, posted_by, created_at";
