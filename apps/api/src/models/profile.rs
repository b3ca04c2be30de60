use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account profile shared by job seekers and HR users (`user_type` tells them apart).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_type: String,
    pub first_name: Option<String>,
    pub location: Option<String>,
    pub experience_level: Option<String>,
    pub skills: Option<Vec<String>>,
    pub bio: Option<String>,
    pub preferred_role: Option<String>,
    pub work_type: Option<Vec<String>>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub availability: Option<String>,
}

/// Skill columns of `jobseeker_profiles`, stored as comma-separated text.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobseekerSkillsRow {
    pub id: Uuid,
    pub technical_skills: Option<String>,
    pub soft_skills: Option<String>,
}

pub const PROFILE_COLUMNS: &str = "id, user_type, first_name, location, experience_level, \
     skills, bio, preferred_role, work_type, salary_min, salary_max, availability";
