//! Axum route handlers for the application tracker.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::state::AppState;
use crate::tracker::status::ApplicationStatus;
use crate::tracker::store::{
    add_application, delete_application, list_applications, update_status, NewApplication,
};

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AddApplicationRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub application: NewApplication,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub user_id: Uuid,
    pub status: ApplicationStatus,
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    Ok(Json(list_applications(&state.db, params.user_id).await?))
}

/// POST /api/v1/applications
pub async fn handle_add_application(
    State(state): State<AppState>,
    Json(request): Json<AddApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let row = add_application(&state.db, request.user_id, request.application).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let row = update_status(&state.db, application_id, request.user_id, request.status).await?;
    Ok(Json(row))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    delete_application(&state.db, application_id, params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_update_accepts_every_stage() {
        let user_id = Uuid::new_v4();
        for stage in ApplicationStatus::ALL {
            let body = format!(r#"{{"user_id": "{user_id}", "status": "{stage}"}}"#);
            let request: UpdateStatusRequest = serde_json::from_str(&body).unwrap();
            assert_eq!(request.status, stage);
        }
    }

    #[test]
    fn test_status_update_rejects_unknown_stage() {
        let body = format!(r#"{{"user_id": "{}", "status": "archived"}}"#, Uuid::new_v4());
        assert!(serde_json::from_str::<UpdateStatusRequest>(&body).is_err());
    }
}
