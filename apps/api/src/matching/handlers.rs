//! Axum route handlers for the Matching API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::db::require_user_type;
use crate::errors::AppError;
use crate::matching::facets::{CandidateFacet, JobFacet};
use crate::matching::ranking::{
    load_active_jobs, load_applied_job_ids, load_hr_applications, load_seeker_skills,
    match_jobs, rank_applications, ScoredApplication, ScoredJob,
};
use crate::matching::scorer::{MatchScorer, ScoreResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScorePairRequest {
    pub candidate: CandidateFacet,
    pub job: JobFacet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSort {
    Newest,
    Score,
}

#[derive(Debug, Deserialize)]
pub struct HrCandidatesQuery {
    pub hr_id: Uuid,
    pub sort: Option<CandidateSort>,
}

#[derive(Debug, Deserialize)]
pub struct JobMatchesQuery {
    pub user_id: Uuid,
    pub min_percent: Option<u32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match/candidate
///
/// Scores a supplied candidate against a supplied job with the recruiter rubric.
pub async fn handle_score_candidate(Json(request): Json<ScorePairRequest>) -> Json<ScoreResult> {
    Json(MatchScorer::recruiter().score(&request.candidate, &request.job))
}

/// POST /api/v1/match/job
///
/// Scores a supplied job against a supplied seeker profile with the seeker rubric.
pub async fn handle_score_job(Json(request): Json<ScorePairRequest>) -> Json<ScoreResult> {
    Json(MatchScorer::job_seeker().score(&request.candidate, &request.job))
}

/// GET /api/v1/hr/candidates?hr_id=..&sort=score
///
/// Applications to the recruiter's jobs, each annotated with a match score.
pub async fn handle_hr_candidates(
    State(state): State<AppState>,
    Query(params): Query<HrCandidatesQuery>,
) -> Result<Json<Vec<ScoredApplication>>, AppError> {
    require_user_type(&state.db, params.hr_id, "hr").await?;

    let loaded = load_hr_applications(&state.db, params.hr_id).await?;
    let sort_by_score = matches!(params.sort, Some(CandidateSort::Score));
    let ranked = rank_applications(&MatchScorer::recruiter(), &loaded, sort_by_score);

    info!(
        "Scored {} applications for recruiter {}",
        ranked.len(),
        params.hr_id
    );
    Ok(Json(ranked))
}

/// GET /api/v1/jobs/matches?user_id=..&min_percent=..
///
/// Active jobs, newest first, each annotated with how well it fits the seeker.
pub async fn handle_job_matches(
    State(state): State<AppState>,
    Query(params): Query<JobMatchesQuery>,
) -> Result<Json<Vec<ScoredJob>>, AppError> {
    if params.min_percent.is_some_and(|p| p > 100) {
        return Err(AppError::Validation(
            "min_percent must be between 0 and 100".to_string(),
        ));
    }

    let profile = require_user_type(&state.db, params.user_id, "jobseeker").await?;
    let seeker = load_seeker_skills(&state.db, params.user_id).await?;
    let candidate = CandidateFacet::for_job_seeker(&profile, seeker.as_ref());

    let jobs = load_active_jobs(&state.db).await?;
    let applied = load_applied_job_ids(&state.db, params.user_id).await?;

    let matches = match_jobs(
        &MatchScorer::job_seeker(),
        &candidate,
        jobs,
        &applied,
        params.min_percent,
    );

    info!(
        "Matched {} jobs for seeker {}",
        matches.len(),
        params.user_id
    );
    Ok(Json(matches))
}
