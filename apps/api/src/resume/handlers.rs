//! Axum route handlers for the Resume API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeDocument, ResumeRow};
use crate::resume::ats::{breakdown, AtsBreakdown};
use crate::resume::store::{load_resume, save_resume, SavedResume};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SaveResumeRequest {
    pub user_id: Uuid,
    pub content: ResumeDocument,
}

#[derive(Debug, Serialize)]
pub struct LoadResumeResponse {
    pub resume: Option<ResumeRow>,
}

/// GET /api/v1/resumes
pub async fn handle_load_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<LoadResumeResponse>, AppError> {
    let resume = load_resume(&state.db, params.user_id).await?;
    Ok(Json(LoadResumeResponse { resume }))
}

/// PUT /api/v1/resumes
pub async fn handle_save_resume(
    State(state): State<AppState>,
    Json(request): Json<SaveResumeRequest>,
) -> Result<Json<SavedResume>, AppError> {
    let saved = save_resume(&state.db, request.user_id, request.content).await?;
    Ok(Json(saved))
}

/// POST /api/v1/resumes/score
///
/// Scores a draft without persisting it.
pub async fn handle_score_resume(Json(content): Json<ResumeDocument>) -> Json<AtsBreakdown> {
    Json(breakdown(&content))
}
