use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One saved question/answer exchange with the chat assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatQuery {
    pub id: i64,
    pub user_id: Uuid,
    pub query: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}
