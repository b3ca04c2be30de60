//! Job postings by recruiters.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Deserializer};
use tracing::info;
use uuid::Uuid;

use crate::db::require_user_type;
use crate::errors::AppError;
use crate::matching::facets::ExperienceLevel;
use crate::models::job::{JobRow, JOB_COLUMNS};
use crate::state::AppState;

const DEFAULT_WORK_TYPE: &str = "full-time";

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub hr_id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub experience_level: Option<String>,
    /// A list, or textarea input with one skill per line (commas also split).
    #[serde(default, deserialize_with = "skill_lines")]
    pub required_skills: Vec<String>,
    pub work_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub availability: Option<String>,
}

/// A posting that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub location: String,
    pub experience_level: ExperienceLevel,
    pub required_skills: Vec<String>,
    pub work_type: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub availability: Option<String>,
}

impl CreateJobRequest {
    pub fn validate(self) -> Result<NewJob, AppError> {
        let mut missing = Vec::new();
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                missing.push(field);
            }
        }
        if self.required_skills.is_empty() {
            missing.push("required_skills");
        }
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let experience_level = match trimmed(self.experience_level) {
            None => ExperienceLevel::Entry,
            Some(raw) => ExperienceLevel::parse(&raw).ok_or_else(|| {
                AppError::Validation(format!("Unknown experience level '{raw}'"))
            })?,
        };

        for bound in [self.salary_min, self.salary_max].into_iter().flatten() {
            if !bound.is_finite() || bound < 0.0 {
                return Err(AppError::Validation(
                    "Salary bounds must be non-negative numbers".to_string(),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(AppError::Validation(
                    "salary_min must not exceed salary_max".to_string(),
                ));
            }
        }

        Ok(NewJob {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            experience_level,
            required_skills: self.required_skills,
            work_type: trimmed(self.work_type).unwrap_or_else(|| DEFAULT_WORK_TYPE.to_string()),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            availability: trimmed(self.availability),
        })
    }
}

fn trimmed(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrLines {
    List(Vec<String>),
    Lines(String),
}

fn skill_lines<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let items: Vec<String> = match Option::<ListOrLines>::deserialize(d)? {
        Some(ListOrLines::List(items)) => items,
        Some(ListOrLines::Lines(raw)) => raw
            .split(|c: char| c == '\n' || c == ',')
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// POST /api/v1/jobs
///
/// Only HR users may post. New jobs start out `active`.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let hr_id = req.hr_id;
    require_user_type(&state.db, hr_id, "hr").await?;
    let job = req.validate()?;

    let row = sqlx::query_as::<_, JobRow>(&format!(
        r#"
        INSERT INTO jobs (title, description, location, experience_level, required_skills,
                          work_type, salary_min, salary_max, availability, status, posted_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'active', $10)
        RETURNING {JOB_COLUMNS}
        "#
    ))
    .bind(&job.title)
    .bind(&job.description)
    .bind(&job.location)
    .bind(job.experience_level.as_str())
    .bind(&job.required_skills)
    .bind(&job.work_type)
    .bind(job.salary_min)
    .bind(job.salary_max)
    .bind(&job.availability)
    .bind(hr_id)
    .fetch_one(&state.db)
    .await?;

    info!("Job {} '{}' posted by {hr_id}", row.id, row.title);
    Ok((StatusCode::CREATED, Json(row)))
}
