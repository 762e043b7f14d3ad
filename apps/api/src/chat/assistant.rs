//! Chat Assistant: pluggable reply backend.
//!
//! Default: `CannedAssistant` (keyword rules, no network).
//! With `LLM_API_KEY` set: `LlmAssistant`, which degrades to canned replies
//! whenever the provider call fails.
//!
//! `AppState` holds an `Arc<dyn ChatAssistant>`, chosen at startup.

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::chat::canned::canned_response;
use crate::chat::prompts::system_prompt;
use crate::llm_client::{ChatMessage, LlmClient};
use crate::models::chat::ChatQuery;
use crate::models::user::UserType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Canned,
    Llm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub backend: Backend,
}

/// Produces a reply to `query`, given the user's type and recent exchanges
/// (oldest first). Never fails: backends must fall back rather than error.
#[async_trait]
pub trait ChatAssistant: Send + Sync {
    async fn respond(&self, user_type: UserType, query: &str, history: &[ChatQuery]) -> Reply;
}

pub struct CannedAssistant;

#[async_trait]
impl ChatAssistant for CannedAssistant {
    async fn respond(&self, user_type: UserType, query: &str, _history: &[ChatQuery]) -> Reply {
        Reply {
            text: canned_response(user_type, query).to_string(),
            backend: Backend::Canned,
        }
    }
}

pub struct LlmAssistant {
    llm: LlmClient,
}

impl LlmAssistant {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

/// System prompt, then each past exchange as a user/assistant pair, then the new query.
pub fn build_messages(user_type: UserType, history: &[ChatQuery], query: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(ChatMessage::system(system_prompt(user_type)));
    for past in history {
        messages.push(ChatMessage::user(past.query.as_str()));
        messages.push(ChatMessage::assistant(past.response.as_str()));
    }
    messages.push(ChatMessage::user(query));
    messages
}

#[async_trait]
impl ChatAssistant for LlmAssistant {
    async fn respond(&self, user_type: UserType, query: &str, history: &[ChatQuery]) -> Reply {
        let messages = build_messages(user_type, history, query);
        match self.llm.chat(&messages).await {
            Ok(text) => Reply {
                text,
                backend: Backend::Llm,
            },
            Err(e) => {
                warn!("LLM reply failed, using canned response: {e}");
                CannedAssistant.respond(user_type, query, history).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::Role;
    use chrono::Utc;
    use uuid::Uuid;

    fn exchange(query: &str, response: &str) -> ChatQuery {
        ChatQuery {
            id: 1,
            user_id: Uuid::new_v4(),
            query: query.to_string(),
            response: response.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_messages_order() {
        let history = vec![exchange("q1", "a1"), exchange("q2", "a2")];
        let messages = build_messages(UserType::UniPostgrad, &history, "q3");

        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User
            ]
        );
        assert_eq!(messages[0].content, system_prompt(UserType::UniPostgrad));
        assert_eq!(messages[1].content, "q1");
        assert_eq!(messages[4].content, "a2");
        assert_eq!(messages[5].content, "q3");
    }

    #[tokio::test]
    async fn test_canned_assistant() {
        let reply = CannedAssistant
            .respond(UserType::UniPostgrad, "interview tips", &[])
            .await;
        assert_eq!(reply.backend, Backend::Canned);
        assert_eq!(reply.text, canned_response(UserType::UniPostgrad, "interview tips"));
    }

    #[tokio::test]
    async fn test_llm_assistant_falls_back_when_unreachable() {
        // Nothing listens on port 9; the request fails at connect time.
        let llm = LlmClient::new("k".to_string(), "http://127.0.0.1:9/v1", "m".to_string()).unwrap();
        let reply = LlmAssistant::new(llm)
            .respond(UserType::HighSchool, "my dse score", &[])
            .await;
        assert_eq!(reply.backend, Backend::Canned);
        assert_eq!(reply.text, canned_response(UserType::HighSchool, "my dse score"));
    }
}
