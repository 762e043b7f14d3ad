use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::search_jobs;
use crate::models::job::{CompanyStats, Job};
use crate::models::user::UserType;
use crate::state::AppState;
use crate::users::load_user;

#[derive(Deserialize)]
pub struct JobsQuery {
    pub user_id: Option<Uuid>,
    pub user_type: Option<UserType>,
    pub discipline: Option<String>,
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    pub company_stats: Option<CompanyStats>,
}

/// GET /api/v1/jobs
///
/// With `user_id`, the stored profile decides the filter and any explicit
/// `user_type`/`discipline` are ignored.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobsQuery>,
) -> Result<Json<Vec<Job>>, AppError> {
    let (user_type, discipline) = match params.user_id {
        Some(id) => {
            let user = load_user(state.store.as_ref(), id).await?;
            (Some(user.user_type), user.discipline)
        }
        None => (params.user_type, params.discipline),
    };

    let jobs = search_jobs(
        &state.jobs.jobs,
        params.q.as_deref().unwrap_or_default(),
        user_type,
        discipline.as_deref(),
    );
    Ok(Json(jobs.into_iter().cloned().collect()))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JobDetail>, AppError> {
    let job = state
        .jobs
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(JobDetail {
        job: job.clone(),
        company_stats: state.jobs.stats_for(&job.company).cloned(),
    }))
}

/// GET /api/v1/companies/stats
pub async fn handle_company_stats(State(state): State<AppState>) -> Json<Vec<CompanyStats>> {
    Json(state.jobs.company_stats.clone())
}

/// GET /api/v1/companies/stats/:company
pub async fn handle_company_stats_for(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> Result<Json<CompanyStats>, AppError> {
    state
        .jobs
        .stats_for(&company)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No stats for company '{company}'")))
}
