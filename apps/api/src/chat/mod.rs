pub mod assistant;
pub mod canned;
pub mod handlers;
pub mod prompts;

use serde::Serialize;
use tracing::info;

use crate::chat::assistant::{Backend, ChatAssistant};
use crate::errors::AppError;
use crate::models::user::User;
use crate::store::Store;

/// Past exchanges sent along with a new query.
pub const HISTORY_WINDOW: usize = 2;

#[derive(Debug, Serialize)]
pub struct ChatOutcome {
    pub response: String,
    pub saved: bool,
    pub limit_reached: bool,
    /// `None` when the limit stopped the query; nothing was saved.
    pub backend: Option<Backend>,
}

pub fn limit_message(limit: usize) -> String {
    format!(
        "You have reached the maximum of {limit} queries. Please refresh the page to start a new session."
    )
}

fn limit_outcome(limit: usize) -> ChatOutcome {
    ChatOutcome {
        response: limit_message(limit),
        saved: false,
        limit_reached: true,
        backend: None,
    }
}

/// Answers one chat query for `user` and saves the exchange, unless the user
/// already has `limit` saved queries.
pub async fn submit_query(
    store: &dyn Store,
    assistant: &dyn ChatAssistant,
    limit: usize,
    user: &User,
    query: &str,
) -> Result<ChatOutcome, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query must not be empty".to_string()));
    }

    // Skips the assistant when the limit is already hit. The insert below
    // re-checks atomically, since concurrent queries can pass this point.
    let used = store.count_queries(user.id).await?;
    if used >= limit {
        info!("User {} hit the chat limit ({used}/{limit})", user.id);
        return Ok(limit_outcome(limit));
    }

    let history = store.recent_queries(user.id, HISTORY_WINDOW).await?;
    let reply = assistant.respond(user.user_type, query, &history).await;
    let saved = store
        .insert_query_within_limit(user.id, query, &reply.text, limit)
        .await?;
    if saved.is_none() {
        info!("User {} hit the chat limit while a reply was pending", user.id);
        return Ok(limit_outcome(limit));
    }

    Ok(ChatOutcome {
        response: reply.text,
        saved: true,
        limit_reached: false,
        backend: Some(reply.backend),
    })
}
