//! Axum route handlers for resume analysis.

use axum::{
    extract::{Path, State},
    Json,
};
use bytes::Bytes;
use redis::Client as RedisClient;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::extract::{prepare_document, ResumeFormat};
use crate::analysis::{AnalysisResult, ResumeAnalyzer};
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeResumeRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResumeResponse {
    pub resume_id: Uuid,
    pub analysis: AnalysisResult,
    pub cached: bool,
    pub backend: String,
}

fn cache_key(resume_id: Uuid) -> String {
    format!("resume_analysis:{resume_id}")
}

/// POST /api/v1/resumes/:id/analyze
///
/// Downloads the resume, extracts its text, runs the analyzer, and stores the result
/// on the resume row. Finished analyses are served from Redis until the TTL expires.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<AnalyzeResumeRequest>,
) -> Result<Json<AnalyzeResumeResponse>, AppError> {
    let resume = sqlx::query_as::<_, ResumeRow>(
        r#"
        SELECT id, user_id, file_name, storage_path, analysis_score, ats_compatible,
               keywords, missing_keywords, strengths, improvements, analysis_data,
               created_at, updated_at
        FROM resumes
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(resume_id)
    .bind(request.user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let backend = state.analyzer.backend().to_string();

    match cache_get(&state.redis, resume_id).await {
        Ok(Some(analysis)) => {
            info!("Serving cached analysis for resume {resume_id}");
            return Ok(Json(AnalyzeResumeResponse {
                resume_id,
                analysis,
                cached: true,
                backend,
            }));
        }
        Ok(None) => {}
        Err(e) => warn!("Analysis cache read failed for resume {resume_id}: {e}"),
    }

    let key = resume.object_key();
    info!("Fetching resume {resume_id} from s3://{}/{key}", state.config.s3_bucket);
    let data = download(&state.s3, &state.config.s3_bucket, &key).await?;

    let format = ResumeFormat::from_file_name(&resume.file_name);
    let analysis = analyze_document(state.analyzer.as_ref(), format, data).await?;

    save_analysis(&state.db, &resume, &analysis).await?;
    info!("Analysis saved for resume {resume_id}");

    if let Err(e) = cache_put(
        &state.redis,
        resume_id,
        &analysis,
        state.config.analysis_cache_ttl_secs,
    )
    .await
    {
        warn!("Analysis cache write failed for resume {resume_id}: {e}");
    }

    Ok(Json(AnalyzeResumeResponse {
        resume_id,
        analysis,
        cached: false,
        backend,
    }))
}

/// Prepares the file off the async runtime, then hands it to the analyzer.
pub async fn analyze_document(
    analyzer: &dyn ResumeAnalyzer,
    format: ResumeFormat,
    data: Bytes,
) -> Result<AnalysisResult, AppError> {
    let document = tokio::task::spawn_blocking(move || prepare_document(format, data))
        .await
        .map_err(|e| AppError::UnprocessableEntity(format!("Resume text extraction failed: {e}")))??;

    analyzer.analyze(&document).await
}

async fn download(s3: &aws_sdk_s3::Client, bucket: &str, key: &str) -> Result<Bytes, AppError> {
    let object = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("GET s3://{bucket}/{key} failed: {e}")))?;

    let body = object
        .body
        .collect()
        .await
        .map_err(|e| AppError::Storage(format!("Reading s3://{bucket}/{key} failed: {e}")))?;

    Ok(body.into_bytes())
}

async fn save_analysis(
    pool: &sqlx::PgPool,
    resume: &ResumeRow,
    analysis: &AnalysisResult,
) -> Result<(), AppError> {
    let analysis_data = serde_json::to_value(analysis).map_err(anyhow::Error::from)?;

    sqlx::query(
        r#"
        UPDATE resumes
        SET analysis_score = $1,
            ats_compatible = $2,
            keywords = $3,
            missing_keywords = $4,
            strengths = $5,
            improvements = $6,
            analysis_data = $7,
            updated_at = NOW()
        WHERE id = $8 AND user_id = $9
        "#,
    )
    .bind(i32::from(analysis.score))
    .bind(analysis.ats_compatible)
    .bind(&analysis.keywords)
    .bind(&analysis.missing_keywords)
    .bind(&analysis.strengths)
    .bind(&analysis.improvements)
    .bind(analysis_data)
    .bind(resume.id)
    .bind(resume.user_id)
    .execute(pool)
    .await?;

    Ok(())
}

async fn cache_get(redis: &RedisClient, resume_id: Uuid) -> Result<Option<AnalysisResult>, AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    let cached: Option<String> = redis::cmd("GET")
        .arg(cache_key(resume_id))
        .query_async(&mut conn)
        .await?;

    // An unreadable entry is treated as a miss and overwritten on the next write.
    Ok(cached.and_then(|raw| serde_json::from_str(&raw).ok()))
}

async fn cache_put(
    redis: &RedisClient,
    resume_id: Uuid,
    analysis: &AnalysisResult,
    ttl_secs: u64,
) -> Result<(), AppError> {
    let payload = serde_json::to_string(analysis).map_err(anyhow::Error::from)?;
    let mut conn = redis.get_multiplexed_async_connection().await?;
    redis::cmd("SET")
        .arg(cache_key(resume_id))
        .arg(payload)
        .arg("EX")
        .arg(ttl_secs)
        .query_async::<_, ()>(&mut conn)
        .await?;
    Ok(())
}
