//! Session repository

use crate::domain::{Session, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, user_id: i64) -> Result<Session>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Session>>;
    async fn update_last_active(&self, id: StringUuid) -> Result<()>;
    async fn revoke(&self, id: StringUuid) -> Result<()>;
}

pub struct SessionRepositoryImpl {
    pool: MySqlPool,
}

impl SessionRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SessionRepositoryImpl {
    async fn create(&self, user_id: i64) -> Result<Session> {
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, created_at, last_active_at)
            VALUES (?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create session")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, created_at, last_active_at, revoked_at
            FROM sessions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn update_last_active(&self, id: StringUuid) -> Result<()> {
        sqlx::query("UPDATE sessions SET last_active_at = NOW() WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn revoke(&self, id: StringUuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE id = ? AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
