use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::{apply, list_with_jobs};
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus, ApplicationWithJob};
use crate::state::AppState;
use crate::users::load_user;

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub user_id: Uuid,
    pub job_id: i64,
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

#[derive(Serialize)]
pub struct AppliedResponse {
    pub applied: bool,
}

/// POST /api/v1/applications
/// 201 for a new application, 200 when the user had already applied.
pub async fn handle_apply(
    State(state): State<AppState>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let (application, created) =
        apply(state.store.as_ref(), &state.jobs, req.user_id, req.job_id).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(application)))
}

/// GET /api/v1/users/:id/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationWithJob>>, AppError> {
    let user = load_user(state.store.as_ref(), user_id).await?;
    let listed = list_with_jobs(state.store.as_ref(), &state.jobs, user.id).await?;
    Ok(Json(listed))
}

/// GET /api/v1/users/:id/applications/:job_id
pub async fn handle_has_applied(
    State(state): State<AppState>,
    Path((user_id, job_id)): Path<(Uuid, i64)>,
) -> Result<Json<AppliedResponse>, AppError> {
    let existing = state.store.find_application(user_id, job_id).await?;
    Ok(Json(AppliedResponse {
        applied: existing.is_some(),
    }))
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<Application>, AppError> {
    state
        .store
        .update_application_status(id, req.status)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}
