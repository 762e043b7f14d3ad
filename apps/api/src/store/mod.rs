//! Persistence seam for users, job applications, and chat history.
//!
//! `AppState` holds an `Arc<dyn Store>`, chosen at startup: `PgStore` when
//! `DATABASE_URL` is set, `MemoryStore` otherwise.

pub mod memory;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationStatus};
use crate::models::chat::ChatQuery;
use crate::models::user::User;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Replaces a stored user. Returns `false` when no such user exists.
    async fn update_user(&self, user: &User) -> Result<bool>;

    /// Creates an application for (user, job), or returns the existing one.
    /// The flag is `true` only when a new row was created.
    async fn create_application(&self, user_id: Uuid, job_id: i64) -> Result<(Application, bool)>;

    async fn find_application(&self, user_id: Uuid, job_id: i64) -> Result<Option<Application>>;

    /// All applications of a user, oldest first.
    async fn list_applications(&self, user_id: Uuid) -> Result<Vec<Application>>;

    async fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<Application>>;

    async fn count_queries(&self, user_id: Uuid) -> Result<usize>;

    /// The last `limit` queries of a user, in chronological order.
    async fn recent_queries(&self, user_id: Uuid, limit: usize) -> Result<Vec<ChatQuery>>;

    /// Saves an exchange only while the user has fewer than `limit` saved
    /// queries. The count and the insert happen atomically; `None` means the
    /// limit was already reached and nothing was saved.
    async fn insert_query_within_limit(
        &self,
        user_id: Uuid,
        query: &str,
        response: &str,
        limit: usize,
    ) -> Result<Option<ChatQuery>>;
}
