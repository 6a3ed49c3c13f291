//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::store::{
    create_job, delete_job, list_active_jobs, list_jobs_for_candidate, list_recruiter_jobs,
    set_job_status, update_job, CreateJobInput, JobFilter, JobSort, UpdateJobInput,
};
use crate::models::job::{JobRow, JobStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ActiveJobsQuery {
    pub user_id: Option<Uuid>,
    pub q: Option<String>,
    pub min_match: Option<u32>,
    pub sort: Option<JobSort>,
}

impl ActiveJobsQuery {
    fn filter(&self) -> JobFilter {
        JobFilter {
            query: self.q.clone(),
            min_match: self.min_match.unwrap_or(0),
            sort: self.sort.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub job: CreateJobInput,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub changes: UpdateJobInput,
}

#[derive(Debug, Deserialize)]
pub struct JobStatusRequest {
    pub user_id: Uuid,
    pub status: JobStatus,
}

/// GET /api/v1/jobs
///
/// `q` filters by text in every case. With `user_id`, each job also carries the candidate's
/// match percentage, `min_match` drops weaker jobs and `sort` (`match` or `date`) picks the
/// order. Without it the list is newest first.
pub async fn handle_list_active_jobs(
    State(state): State<AppState>,
    Query(params): Query<ActiveJobsQuery>,
) -> Result<Response, AppError> {
    let filter = params.filter();
    let response = match params.user_id {
        Some(user_id) => {
            Json(list_jobs_for_candidate(&state.db, user_id, &filter).await?).into_response()
        }
        None => {
            let jobs: Vec<JobRow> = list_active_jobs(&state.db)
                .await?
                .into_iter()
                .filter(|job| filter.matches_query(job))
                .collect();
            Json(jobs).into_response()
        }
    };
    Ok(response)
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let job = create_job(&state.db, request.user_id, request.job).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs/recruiter
pub async fn handle_list_recruiter_jobs(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(list_recruiter_jobs(&state.db, params.user_id).await?))
}

/// PATCH /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<UpdateJobRequest>,
) -> Result<Json<JobRow>, AppError> {
    let job = update_job(&state.db, job_id, request.user_id, request.changes).await?;
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    delete_job(&state.db, job_id, params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/jobs/:id/status
pub async fn handle_set_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<JobStatusRequest>,
) -> Result<Json<JobRow>, AppError> {
    let job = set_job_status(&state.db, job_id, request.user_id, request.status).await?;
    Ok(Json(job))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    fn parse(query: &str) -> ActiveJobsQuery {
        let uri: Uri = format!("/api/v1/jobs?{query}").parse().unwrap();
        Query::<ActiveJobsQuery>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_query_defaults_to_match_sort_without_threshold() {
        let filter = parse("").filter();
        assert_eq!(filter.sort, JobSort::Match);
        assert_eq!(filter.min_match, 0);
        assert!(filter.query.is_none());
    }

    #[test]
    fn test_query_reads_search_threshold_and_sort() {
        let params = parse("q=rust&min_match=60&sort=date");
        let filter = params.filter();
        assert_eq!(filter.query.as_deref(), Some("rust"));
        assert_eq!(filter.min_match, 60);
        assert_eq!(filter.sort, JobSort::Date);
        assert!(params.user_id.is_none());
    }
}
