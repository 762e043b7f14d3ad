//! Job applications: idempotent apply, listing joined with postings, and
//! status tracking.

pub mod handlers;

use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::JobBoard;
use crate::models::application::{Application, ApplicationWithJob};
use crate::store::Store;
use crate::users::load_user;

/// Records that `user_id` applied to `job_id`. Applying twice returns the
/// first application; the flag is `true` only for a new one.
pub async fn apply(
    store: &dyn Store,
    board: &JobBoard,
    user_id: Uuid,
    job_id: i64,
) -> Result<(Application, bool), AppError> {
    if board.get(job_id).is_none() {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    load_user(store, user_id).await?;

    let (application, created) = store.create_application(user_id, job_id).await?;
    if created {
        tracing::info!("User {user_id} applied to job {job_id}");
    }
    Ok((application, created))
}

/// A user's applications with their postings. Applications whose posting is
/// no longer on the board are left out.
pub async fn list_with_jobs(
    store: &dyn Store,
    board: &JobBoard,
    user_id: Uuid,
) -> Result<Vec<ApplicationWithJob>, AppError> {
    let applications = store.list_applications(user_id).await?;
    Ok(applications
        .into_iter()
        .filter_map(|application| {
            let job = board.get(application.job_id)?.clone();
            Some(ApplicationWithJob { application, job })
        })
        .collect())
}
