use axum::Json;
use serde::Deserialize;

use crate::matching::{match_percentage, MatchResult};

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub user_skills: Vec<String>,
    #[serde(default)]
    pub job_skills: Vec<String>,
}

/// POST /api/v1/match
pub async fn handle_match(Json(request): Json<MatchRequest>) -> Json<MatchResult> {
    Json(match_percentage(&request.user_skills, &request.job_skills))
}
