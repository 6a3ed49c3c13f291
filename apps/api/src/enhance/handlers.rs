//! Axum route handlers for the AI enhancement API.
//!
//! These always answer 200 with `{data}` or `{error}`. Missing text fields count as empty
//! input, and a body that does not deserialize at all gets the operation's validation message.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::enhance::service::{
    EMPTY_JOB_DESCRIPTION_MESSAGE, EMPTY_JOB_TITLE_MESSAGE, EMPTY_TEXT_MESSAGE,
};
use crate::enhance::{ActionResult, EnhancementKind, JobMatchAnalysis};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: EnhancementKind,
}

#[derive(Debug, Deserialize)]
pub struct SkillSuggestionRequest {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub current_skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobMatchRequest {
    #[serde(default)]
    pub user_skills: Vec<String>,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub job_title: String,
}

/// Unwraps the body, or turns the rejection into an `{error}` payload.
fn accept<T, R>(
    payload: Result<Json<T>, JsonRejection>,
    message: &str,
) -> Result<T, Json<ActionResult<R>>> {
    payload.map(|Json(request)| request).map_err(|rejection| {
        warn!("Rejected AI request body: {}", rejection.body_text());
        Json(ActionResult::error(message))
    })
}

/// POST /api/v1/ai/enhance
pub async fn handle_enhance(
    State(state): State<AppState>,
    payload: Result<Json<EnhanceRequest>, JsonRejection>,
) -> Json<ActionResult<String>> {
    let request = match accept(payload, EMPTY_TEXT_MESSAGE) {
        Ok(request) => request,
        Err(response) => return response,
    };
    Json(state.ai.enhance_description(&request.text, request.kind).await)
}

/// POST /api/v1/ai/skill-suggestions
pub async fn handle_skill_suggestions(
    State(state): State<AppState>,
    payload: Result<Json<SkillSuggestionRequest>, JsonRejection>,
) -> Json<ActionResult<Vec<String>>> {
    let request = match accept(payload, EMPTY_JOB_TITLE_MESSAGE) {
        Ok(request) => request,
        Err(response) => return response,
    };
    Json(
        state
            .ai
            .generate_skill_suggestions(&request.job_title, &request.current_skills)
            .await,
    )
}

/// POST /api/v1/ai/job-match
pub async fn handle_job_match(
    State(state): State<AppState>,
    payload: Result<Json<JobMatchRequest>, JsonRejection>,
) -> Json<ActionResult<JobMatchAnalysis>> {
    let request = match accept(payload, EMPTY_JOB_DESCRIPTION_MESSAGE) {
        Ok(request) => request,
        Err(response) => return response,
    };
    Json(
        state
            .ai
            .analyze_job_match(
                &request.user_skills,
                &request.job_description,
                &request.job_title,
            )
            .await,
    )
}
