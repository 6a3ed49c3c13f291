//! Job posting persistence. Every mutation is scoped to the owning recruiter.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::fetch_profile;
use crate::errors::AppError;
use crate::matching::match_percentage;
use crate::models::job::{JobRow, JobStatus, JobWithMatch};
use crate::models::profile::UserRole;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobInput {
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub status: Option<JobStatus>,
}

impl CreateJobInput {
    fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("title", &self.title),
            ("company", &self.company),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateJobInput {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub status: Option<JobStatus>,
}

impl UpdateJobInput {
    /// A field that is present must still satisfy the create rules.
    fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("title", &self.title),
            ("company", &self.company),
            ("description", &self.description),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(AppError::Validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }
}

/// Order of the candidate job list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobSort {
    /// Best match first; ties stay newest first.
    #[default]
    Match,
    /// Newest first.
    Date,
}

/// Search and threshold applied to the active job list.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Case-insensitive substring over title, company, description and required skills.
    pub query: Option<String>,
    /// Minimum match percentage. 0 keeps everything.
    pub min_match: u32,
    pub sort: JobSort,
}

impl JobFilter {
    /// Whether `job` passes the text search. A blank query passes everything.
    pub fn matches_query(&self, job: &JobRow) -> bool {
        let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
            return true;
        };
        let query = query.to_lowercase();
        let contains = |field: &str| field.to_lowercase().contains(&query);

        contains(job.title.as_str())
            || contains(job.company.as_str())
            || contains(job.description.as_str())
            || job.required_skills.iter().any(|s| contains(s.as_str()))
    }
}

pub async fn create_job(
    pool: &PgPool,
    recruiter_id: Uuid,
    input: CreateJobInput,
) -> Result<JobRow, AppError> {
    input.validate()?;

    let is_recruiter = fetch_profile(pool, recruiter_id)
        .await?
        .is_some_and(|p| p.role == UserRole::Recruiter);
    if !is_recruiter {
        return Err(AppError::Forbidden(
            "Only recruiters can create job postings".to_string(),
        ));
    }

    let job = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (recruiter_id, title, company, description, required_skills, location, salary_range, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(recruiter_id)
    .bind(&input.title)
    .bind(&input.company)
    .bind(&input.description)
    .bind(&input.required_skills)
    .bind(&input.location)
    .bind(&input.salary_range)
    .bind(input.status.unwrap_or_default().as_str())
    .fetch_one(pool)
    .await?;

    info!("Recruiter {recruiter_id} created job {}", job.id);
    Ok(job)
}

/// Active postings, newest first.
pub async fn list_active_jobs(pool: &PgPool) -> Result<Vec<JobRow>, AppError> {
    let jobs = sqlx::query_as::<_, JobRow>(
        "SELECT * FROM jobs WHERE status = $1 ORDER BY created_at DESC",
    )
    .bind(JobStatus::Active.as_str())
    .fetch_all(pool)
    .await?;
    Ok(jobs)
}

/// Active postings annotated with the candidate's skill match, filtered and ordered by
/// `filter`. A user without a profile matches nothing.
pub async fn list_jobs_for_candidate(
    pool: &PgPool,
    user_id: Uuid,
    filter: &JobFilter,
) -> Result<Vec<JobWithMatch>, AppError> {
    let skills = fetch_profile(pool, user_id)
        .await?
        .map(|p| p.skills)
        .unwrap_or_default();
    let jobs = list_active_jobs(pool).await?;
    Ok(rank_by_match(jobs, &skills, filter))
}

/// Annotates each job with its match against `user_skills`, drops jobs that fail the search or
/// fall under `min_match`, then sorts. Both orders are stable, so ties keep their incoming
/// (newest-first) order.
pub fn rank_by_match(
    jobs: Vec<JobRow>,
    user_skills: &[String],
    filter: &JobFilter,
) -> Vec<JobWithMatch> {
    let mut ranked: Vec<JobWithMatch> = jobs
        .into_iter()
        .filter(|job| filter.matches_query(job))
        .map(|job| {
            let result = match_percentage(user_skills, &job.required_skills);
            JobWithMatch {
                job,
                match_percentage: result.percentage,
                matched_skills: result.matched_skills,
            }
        })
        .filter(|j| j.match_percentage >= filter.min_match)
        .collect();

    match filter.sort {
        JobSort::Match => ranked.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage)),
        JobSort::Date => ranked.sort_by(|a, b| b.job.created_at.cmp(&a.job.created_at)),
    }
    ranked
}

pub async fn list_recruiter_jobs(
    pool: &PgPool,
    recruiter_id: Uuid,
) -> Result<Vec<JobRow>, AppError> {
    let jobs = sqlx::query_as::<_, JobRow>(
        "SELECT * FROM jobs WHERE recruiter_id = $1 ORDER BY created_at DESC",
    )
    .bind(recruiter_id)
    .fetch_all(pool)
    .await?;
    Ok(jobs)
}

pub async fn update_job(
    pool: &PgPool,
    job_id: Uuid,
    recruiter_id: Uuid,
    input: UpdateJobInput,
) -> Result<JobRow, AppError> {
    input.validate()?;

    sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs SET
            title = COALESCE($3, title),
            company = COALESCE($4, company),
            description = COALESCE($5, description),
            required_skills = COALESCE($6, required_skills),
            location = COALESCE($7, location),
            salary_range = COALESCE($8, salary_range),
            status = COALESCE($9, status),
            updated_at = NOW()
        WHERE id = $1 AND recruiter_id = $2
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(recruiter_id)
    .bind(&input.title)
    .bind(&input.company)
    .bind(&input.description)
    .bind(&input.required_skills)
    .bind(&input.location)
    .bind(&input.salary_range)
    .bind(input.status.map(|s| s.as_str()))
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

pub async fn delete_job(pool: &PgPool, job_id: Uuid, recruiter_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND recruiter_id = $2")
        .bind(job_id)
        .bind(recruiter_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    info!("Recruiter {recruiter_id} deleted job {job_id}");
    Ok(())
}

/// Opens or closes a posting. Drafts are set through `update_job`, not here.
pub async fn set_job_status(
    pool: &PgPool,
    job_id: Uuid,
    recruiter_id: Uuid,
    status: JobStatus,
) -> Result<JobRow, AppError> {
    if status == JobStatus::Draft {
        return Err(AppError::Validation(
            "status must be 'active' or 'closed'".to_string(),
        ));
    }
    update_job(
        pool,
        job_id,
        recruiter_id,
        UpdateJobInput {
            status: Some(status),
            ..Default::default()
        },
    )
    .await
}
