use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ProfileRow, PROFILE_COLUMNS};

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL (max {max_connections} connections)...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Loads a profile and checks it belongs to the expected kind of user.
/// Unknown id → `NotFound`; wrong `user_type` → `Forbidden`.
pub async fn require_user_type(
    pool: &PgPool,
    user_id: Uuid,
    user_type: &str,
) -> Result<ProfileRow, AppError> {
    let profile = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))?;

    if profile.user_type != user_type {
        return Err(AppError::Forbidden);
    }
    Ok(profile)
}
