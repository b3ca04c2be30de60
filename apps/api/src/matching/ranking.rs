//! Ranking: applies a `MatchScorer` across lists of stored applications or jobs.
//!
//! Loading is split from scoring so the scoring side stays pure and testable.
//! Every (candidate, job) pair is scored independently; list order never affects a score.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::facets::{CandidateFacet, JobFacet};
use crate::matching::scorer::{CriterionScore, MatchScorer};
use crate::models::application::ApplicationRow;
use crate::models::job::{JobRow, JOB_COLUMNS};
use crate::models::profile::{JobseekerSkillsRow, ProfileRow, PROFILE_COLUMNS};

#[derive(Debug, Clone, Serialize)]
pub struct ScoredApplication {
    pub application: ApplicationRow,
    pub job_title: String,
    pub applicant_name: Option<String>,
    pub calculated_match_score: u32,
    pub breakdown: Vec<CriterionScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredJob {
    pub job: JobRow,
    pub match_percent: u32,
    pub already_applied: bool,
    pub breakdown: Vec<CriterionScore>,
}

/// Applications for the recruiter's jobs plus the rows needed to score them.
pub struct HrApplications {
    pub applications: Vec<ApplicationRow>,
    pub jobs: HashMap<Uuid, JobRow>,
    pub applicants: HashMap<Uuid, ProfileRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores each application against its job. Applications whose job is gone are dropped;
/// a missing applicant profile scores as an empty facet.
pub fn rank_applications(
    scorer: &MatchScorer,
    loaded: &HrApplications,
    sort_by_score: bool,
) -> Vec<ScoredApplication> {
    let mut ranked: Vec<ScoredApplication> = loaded
        .applications
        .iter()
        .filter_map(|application| {
            let job = loaded.jobs.get(&application.job_id)?;
            let applicant = loaded.applicants.get(&application.user_id);
            let candidate = applicant
                .map(CandidateFacet::from_profile)
                .unwrap_or_default();
            let result = scorer.score(&candidate, &JobFacet::from_job(job));

            Some(ScoredApplication {
                application: application.clone(),
                job_title: job.title.clone(),
                applicant_name: applicant.and_then(|p| p.first_name.clone()),
                calculated_match_score: result.percent,
                breakdown: result.breakdown,
            })
        })
        .collect();

    if sort_by_score {
        // Stable: equal scores keep newest-first order.
        ranked.sort_by(|a, b| b.calculated_match_score.cmp(&a.calculated_match_score));
    }
    ranked
}

pub fn match_jobs(
    scorer: &MatchScorer,
    candidate: &CandidateFacet,
    jobs: Vec<JobRow>,
    applied: &HashSet<Uuid>,
    min_percent: Option<u32>,
) -> Vec<ScoredJob> {
    jobs.into_iter()
        .map(|job| {
            let result = scorer.score(candidate, &JobFacet::from_job(&job));
            ScoredJob {
                already_applied: applied.contains(&job.id),
                match_percent: result.percent,
                breakdown: result.breakdown,
                job,
            }
        })
        .filter(|scored| min_percent.map_or(true, |min| scored.match_percent >= min))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Loading
// ────────────────────────────────────────────────────────────────────────────

pub async fn load_hr_applications(pool: &PgPool, hr_id: Uuid) -> Result<HrApplications, AppError> {
    let jobs = sqlx::query_as::<_, JobRow>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs WHERE posted_by = $1"
    ))
    .bind(hr_id)
    .fetch_all(pool)
    .await?;

    let job_ids: Vec<Uuid> = jobs.iter().map(|j| j.id).collect();

    let applications = sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT id, job_id, user_id, resume_id, status, created_at
        FROM applications
        WHERE job_id = ANY($1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(&job_ids)
    .fetch_all(pool)
    .await?;

    let applicant_ids: Vec<Uuid> = applications
        .iter()
        .map(|a| a.user_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let applicants = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ANY($1)"
    ))
    .bind(&applicant_ids)
    .fetch_all(pool)
    .await?;

    Ok(HrApplications {
        applications,
        jobs: jobs.into_iter().map(|j| (j.id, j)).collect(),
        applicants: applicants.into_iter().map(|p| (p.id, p)).collect(),
    })
}

pub async fn load_active_jobs(pool: &PgPool) -> Result<Vec<JobRow>, AppError> {
    Ok(sqlx::query_as::<_, JobRow>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs WHERE status = 'active' ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?)
}

pub async fn load_seeker_skills(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<JobseekerSkillsRow>, AppError> {
    Ok(sqlx::query_as::<_, JobseekerSkillsRow>(
        "SELECT id, technical_skills, soft_skills FROM jobseeker_profiles WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

pub async fn load_applied_job_ids(pool: &PgPool, user_id: Uuid) -> Result<HashSet<Uuid>, AppError> {
    let ids: Vec<Uuid> = sqlx::query_scalar("SELECT job_id FROM applications WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(ids.into_iter().collect())
}
