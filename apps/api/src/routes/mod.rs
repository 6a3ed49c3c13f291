pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::enhance::handlers as enhance;
use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::tracker::handlers as tracker;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // AI enhancement
        .route("/api/v1/ai/enhance", post(enhance::handle_enhance))
        .route(
            "/api/v1/ai/skill-suggestions",
            post(enhance::handle_skill_suggestions),
        )
        .route("/api/v1/ai/job-match", post(enhance::handle_job_match))
        // Skill matching
        .route("/api/v1/match", post(matching::handle_match))
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resume::handle_load_resume).put(resume::handle_save_resume),
        )
        .route("/api/v1/resumes/score", post(resume::handle_score_resume))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_active_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/recruiter",
            get(jobs::handle_list_recruiter_jobs),
        )
        .route(
            "/api/v1/jobs/:id",
            patch(jobs::handle_update_job).delete(jobs::handle_delete_job),
        )
        .route("/api/v1/jobs/:id/status", patch(jobs::handle_set_job_status))
        // Application tracker
        .route(
            "/api/v1/applications",
            get(tracker::handle_list_applications).post(tracker::handle_add_application),
        )
        .route(
            "/api/v1/applications/:id",
            delete(tracker::handle_delete_application),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(tracker::handle_update_status),
        )
        .with_state(state)
}
