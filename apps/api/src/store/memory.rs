use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationStatus};
use crate::models::chat::ChatQuery;
use crate::models::user::User;
use crate::store::Store;

/// Process-local store for demo mode and tests. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    applications: Vec<Application>,
    queries: Vec<ChatQuery>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&user.id) {
            anyhow::bail!("user {} already exists", user.id);
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn update_user(&self, user: &User) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_application(&self, user_id: Uuid, job_id: i64) -> Result<(Application, bool)> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner
            .applications
            .iter()
            .find(|a| a.user_id == user_id && a.job_id == job_id)
        {
            return Ok((existing.clone(), false));
        }

        let application = Application {
            id: inner.applications.len() as i64 + 1,
            user_id,
            job_id,
            status: ApplicationStatus::Applied,
            applied_at: Utc::now(),
        };
        inner.applications.push(application.clone());
        Ok((application, true))
    }

    async fn find_application(&self, user_id: Uuid, job_id: i64) -> Result<Option<Application>> {
        Ok(self
            .inner
            .read()
            .await
            .applications
            .iter()
            .find(|a| a.user_id == user_id && a.job_id == job_id)
            .cloned())
    }

    async fn list_applications(&self, user_id: Uuid) -> Result<Vec<Application>> {
        Ok(self
            .inner
            .read()
            .await
            .applications
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .map(|a| {
                a.status = status;
                a.clone()
            }))
    }

    async fn count_queries(&self, user_id: Uuid) -> Result<usize> {
        Ok(self
            .inner
            .read()
            .await
            .queries
            .iter()
            .filter(|q| q.user_id == user_id)
            .count())
    }

    async fn recent_queries(&self, user_id: Uuid, limit: usize) -> Result<Vec<ChatQuery>> {
        let inner = self.inner.read().await;
        let mine: Vec<&ChatQuery> = inner.queries.iter().filter(|q| q.user_id == user_id).collect();
        let skip = mine.len().saturating_sub(limit);
        Ok(mine.into_iter().skip(skip).cloned().collect())
    }

    async fn insert_query_within_limit(
        &self,
        user_id: Uuid,
        query: &str,
        response: &str,
        limit: usize,
    ) -> Result<Option<ChatQuery>> {
        let mut inner = self.inner.write().await;
        let used = inner.queries.iter().filter(|q| q.user_id == user_id).count();
        if used >= limit {
            return Ok(None);
        }
        let saved = ChatQuery {
            id: inner.queries.len() as i64 + 1,
            user_id,
            query: query.to_string(),
            response: response.to_string(),
            created_at: Utc::now(),
        };
        inner.queries.push(saved.clone());
        Ok(Some(saved))
    }
}
