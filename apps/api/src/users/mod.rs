//! User profiles: creation, lookup and partial updates, with the validation
//! rules for email, discipline and DSE scores.

pub mod handlers;

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::dse::grade::Grade;
use crate::dse::scores::ScoresInput;
use crate::errors::AppError;
use crate::models::user::{User, UserType, DISCIPLINES};
use crate::store::Store;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub user_type: UserType,
    pub dse_scores: Option<ScoresInput>,
    pub discipline: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub user_type: Option<UserType>,
    pub dse_scores: Option<ScoresInput>,
    pub discipline: Option<String>,
}

/// Fetches a user or fails with 404.
pub async fn load_user(store: &dyn Store, id: Uuid) -> Result<User, AppError> {
    store
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
}

fn validate_email(email: &str) -> Result<String, AppError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(email.to_string())
}

fn validate_discipline(discipline: &str) -> Result<String, AppError> {
    DISCIPLINES
        .iter()
        .find(|d| **d == discipline)
        .map(|d| d.to_string())
        .ok_or_else(|| {
            AppError::Validation(format!(
                "unknown discipline '{discipline}', expected one of: {}",
                DISCIPLINES.join(", ")
            ))
        })
}

fn validate_scores(input: &ScoresInput) -> Result<BTreeMap<String, Grade>, AppError> {
    Ok(input.validate()?.to_flat())
}

/// University students and graduates must pick a discipline.
fn check_profile(user: &User) -> Result<(), AppError> {
    if user.user_type == UserType::UniPostgrad && user.discipline.is_none() {
        return Err(AppError::Validation(
            "uni_postgrad users must choose a discipline".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_user(store: &dyn Store, req: CreateUserRequest) -> Result<User, AppError> {
    let mut user = User::new(validate_email(&req.email)?, req.user_type);
    if let Some(scores) = &req.dse_scores {
        user.dse_scores = Some(validate_scores(scores)?);
    }
    if let Some(discipline) = &req.discipline {
        user.discipline = Some(validate_discipline(discipline)?);
    }
    check_profile(&user)?;

    store.insert_user(&user).await?;
    tracing::info!("Created {} user {}", user.user_type, user.id);
    Ok(user)
}

/// Merges the provided fields into the stored profile.
pub async fn update_user(
    store: &dyn Store,
    id: Uuid,
    req: UpdateUserRequest,
) -> Result<User, AppError> {
    let mut user = load_user(store, id).await?;
    if let Some(user_type) = req.user_type {
        user.user_type = user_type;
    }
    if let Some(scores) = &req.dse_scores {
        user.dse_scores = Some(validate_scores(scores)?);
    }
    if let Some(discipline) = &req.discipline {
        user.discipline = Some(validate_discipline(discipline)?);
    }
    check_profile(&user)?;
    user.updated_at = Some(Utc::now());

    if !store.update_user(&user).await? {
        return Err(AppError::NotFound(format!("User {id} not found")));
    }
    Ok(user)
}
