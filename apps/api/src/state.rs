use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::analysis::ResumeAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Cache for finished resume analyses.
    pub redis: RedisClient,
    pub s3: S3Client,
    pub config: Config,
    /// Pluggable resume analyzer. Default: GeminiResumeAnalyzer.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
}
