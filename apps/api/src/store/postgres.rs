use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dse::grade::Grade;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::chat::ChatQuery;
use crate::models::user::{User, UserType};
use crate::store::Store;

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    user_type: String,
    dse_scores: Option<Json<BTreeMap<String, Grade>>>,
    discipline: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            email: row.email,
            user_type: row
                .user_type
                .parse::<UserType>()
                .with_context(|| format!("corrupt user_type for user {}", row.id))?,
            dse_scores: row.dse_scores.map(|Json(scores)| scores),
            discipline: row.discipline,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: i64,
    user_id: Uuid,
    job_id: i64,
    status: String,
    applied_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = anyhow::Error;

    fn try_from(row: ApplicationRow) -> Result<Self> {
        Ok(Application {
            id: row.id,
            user_id: row.user_id,
            job_id: row.job_id,
            status: row
                .status
                .parse::<ApplicationStatus>()
                .with_context(|| format!("corrupt status for application {}", row.id))?,
            applied_at: row.applied_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ChatQueryRow {
    id: i64,
    user_id: Uuid,
    query: String,
    response: String,
    created_at: DateTime<Utc>,
}

impl From<ChatQueryRow> for ChatQuery {
    fn from(row: ChatQueryRow) -> Self {
        ChatQuery {
            id: row.id,
            user_id: row.user_id,
            query: row.query,
            response: row.response,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, user_type, dse_scores, discipline, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(user.user_type.as_str())
        .bind(user.dse_scores.as_ref().map(Json))
        .bind(&user.discipline)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn update_user(&self, user: &User) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, user_type = $3, dse_scores = $4, discipline = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(user.user_type.as_str())
        .bind(user.dse_scores.as_ref().map(Json))
        .bind(&user.discipline)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_application(&self, user_id: Uuid, job_id: i64) -> Result<(Application, bool)> {
        let inserted: Option<ApplicationRow> = sqlx::query_as(
            r#"
            INSERT INTO applications (user_id, job_id, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, job_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(job_id)
        .bind(ApplicationStatus::Applied.as_str())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok((Application::try_from(row)?, true));
        }

        let existing = self
            .find_application(user_id, job_id)
            .await?
            .with_context(|| format!("application for job {job_id} vanished after conflict"))?;
        Ok((existing, false))
    }

    async fn find_application(&self, user_id: Uuid, job_id: i64) -> Result<Option<Application>> {
        let row: Option<ApplicationRow> =
            sqlx::query_as("SELECT * FROM applications WHERE user_id = $1 AND job_id = $2")
                .bind(user_id)
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Application::try_from).transpose()
    }

    async fn list_applications(&self, user_id: Uuid) -> Result<Vec<Application>> {
        let rows: Vec<ApplicationRow> =
            sqlx::query_as("SELECT * FROM applications WHERE user_id = $1 ORDER BY id ASC")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(Application::try_from).collect()
    }

    async fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let row: Option<ApplicationRow> =
            sqlx::query_as("UPDATE applications SET status = $2 WHERE id = $1 RETURNING *")
                .bind(id)
                .bind(status.as_str())
                .fetch_optional(&self.pool)
                .await?;
        row.map(Application::try_from).transpose()
    }

    async fn count_queries(&self, user_id: Uuid) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chat_queries WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count)?)
    }

    async fn recent_queries(&self, user_id: Uuid, limit: usize) -> Result<Vec<ChatQuery>> {
        let rows: Vec<ChatQueryRow> = sqlx::query_as(
            r#"
            SELECT * FROM (
                SELECT * FROM chat_queries
                WHERE user_id = $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
            ) recent
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(i64::try_from(limit)?)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ChatQuery::from).collect())
    }

    async fn insert_query_within_limit(
        &self,
        user_id: Uuid,
        query: &str,
        response: &str,
        limit: usize,
    ) -> Result<Option<ChatQuery>> {
        let mut tx = self.pool.begin().await?;

        // Held until commit/rollback; serializes count-then-insert per user.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let used: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chat_queries WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        if usize::try_from(used)? >= limit {
            tx.rollback().await?;
            return Ok(None);
        }

        let row: ChatQueryRow = sqlx::query_as(
            "INSERT INTO chat_queries (user_id, query, response) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(query)
        .bind(response)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(row.into()))
    }
}
