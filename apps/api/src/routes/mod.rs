pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::applications;
use crate::jobs;
use crate::matching::handlers as matching;
use crate::state::AppState;

/// Stateless routes: health and pure scoring over caller-supplied facets.
pub fn stateless_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/match/candidate",
            post(matching::handle_score_candidate),
        )
        .route("/api/v1/match/job", post(matching::handle_score_job))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(stateless_router::<AppState>())
        // Matching over stored profiles and jobs
        .route("/api/v1/hr/candidates", get(matching::handle_hr_candidates))
        .route("/api/v1/jobs/matches", get(matching::handle_job_matches))
        // Job board
        .route("/api/v1/jobs", post(jobs::handle_create_job))
        .route(
            "/api/v1/jobs/:id/apply",
            post(applications::handle_apply).delete(applications::handle_withdraw),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        // Resume analysis
        .route(
            "/api/v1/resumes/:id/analyze",
            post(analysis::handle_analyze_resume),
        )
        .with_state(state)
}
