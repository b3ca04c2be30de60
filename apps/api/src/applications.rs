//! Job applications: seekers apply and withdraw, recruiters decide.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::db::require_user_type;
use crate::errors::AppError;
use crate::models::application::{ApplicationDecision, ApplicationRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub hr_id: Uuid,
    pub status: ApplicationDecision,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub user_id: Uuid,
    /// The resume the recruiter will see with this application.
    pub resume_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawQuery {
    pub user_id: Uuid,
}

/// Only active jobs take new applications.
pub fn ensure_accepting(job_status: &str) -> Result<(), AppError> {
    if job_status.trim().eq_ignore_ascii_case("active") {
        Ok(())
    } else {
        Err(AppError::UnprocessableEntity(format!(
            "Job is {job_status} and no longer accepts applications"
        )))
    }
}

/// POST /api/v1/jobs/:id/apply
///
/// Records the application and bumps the job's application count in one transaction.
/// Applying twice to the same job is a conflict.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    require_user_type(&state.db, req.user_id, "jobseeker").await?;

    let job_status: Option<String> = sqlx::query_scalar("SELECT status FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?;
    let job_status =
        job_status.ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    ensure_accepting(&job_status)?;

    let resume: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(req.resume_id)
            .bind(req.user_id)
            .fetch_optional(&state.db)
            .await?;
    if resume.is_none() {
        return Err(AppError::NotFound(format!(
            "Resume {} not found",
            req.resume_id
        )));
    }

    let mut tx = state.db.begin().await?;

    let application = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (job_id, user_id, resume_id, status)
        VALUES ($1, $2, $3, 'pending')
        ON CONFLICT (job_id, user_id) DO NOTHING
        RETURNING id, job_id, user_id, resume_id, status, created_at
        "#,
    )
    .bind(job_id)
    .bind(req.user_id)
    .bind(req.resume_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::Conflict(format!("Already applied to job {job_id}")))?;

    sqlx::query("UPDATE jobs SET applications_count = applications_count + 1 WHERE id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("Application {} filed for job {job_id} by {}", application.id, req.user_id);
    Ok((StatusCode::CREATED, Json(application)))
}

/// DELETE /api/v1/jobs/:id/apply?user_id=..
///
/// Withdraws the seeker's application; the job's count never drops below zero.
pub async fn handle_withdraw(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<WithdrawQuery>,
) -> Result<StatusCode, AppError> {
    require_user_type(&state.db, params.user_id, "jobseeker").await?;

    let mut tx = state.db.begin().await?;

    let removed = sqlx::query("DELETE FROM applications WHERE job_id = $1 AND user_id = $2")
        .bind(job_id)
        .bind(params.user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if removed == 0 {
        return Err(AppError::NotFound(format!(
            "No application to job {job_id} from {}",
            params.user_id
        )));
    }

    sqlx::query(
        "UPDATE jobs SET applications_count = GREATEST(applications_count - 1, 0) WHERE id = $1",
    )
    .bind(job_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!("Application to job {job_id} withdrawn by {}", params.user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/applications/:id/status
///
/// Only the recruiter who posted the job may accept or reject an application.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<StatusCode, AppError> {
    require_user_type(&state.db, req.hr_id, "hr").await?;

    let posted_by: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT j.posted_by
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE a.id = $1
        "#,
    )
    .bind(application_id)
    .fetch_optional(&state.db)
    .await?;

    let posted_by = posted_by
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;
    if posted_by != req.hr_id {
        return Err(AppError::Forbidden);
    }

    sqlx::query("UPDATE applications SET status = $1 WHERE id = $2")
        .bind(req.status.as_str())
        .bind(application_id)
        .execute(&state.db)
        .await?;

    info!(
        "Application {application_id} marked {} by {}",
        req.status.as_str(),
        req.hr_id
    );
    Ok(StatusCode::NO_CONTENT)
}
