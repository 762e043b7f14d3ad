use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::chat::{submit_query, ChatOutcome};
use crate::errors::AppError;
use crate::models::chat::ChatQuery;
use crate::state::AppState;
use crate::users::load_user;

const DEFAULT_HISTORY_LIMIT: usize = 10;
const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub user_id: Uuid,
    pub query: String,
}

#[derive(Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

fn history_limit(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT)
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatOutcome>, AppError> {
    let user = load_user(state.store.as_ref(), req.user_id).await?;
    let outcome = submit_query(
        state.store.as_ref(),
        state.assistant.as_ref(),
        state.config.chat_query_limit,
        &user,
        &req.query,
    )
    .await?;
    Ok(Json(outcome))
}

/// GET /api/v1/users/:id/chat/history
pub async fn handle_chat_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<ChatQuery>>, AppError> {
    let user = load_user(state.store.as_ref(), user_id).await?;
    let history = state
        .store
        .recent_queries(user.id, history_limit(params.limit))
        .await?;
    Ok(Json(history))
}
