//! Context repository

use super::{map_restricted_delete, map_unique_violation};
use crate::domain::{Context, ContextInput};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContextRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Context>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Context>>;
    async fn create(&self, input: &ContextInput) -> Result<Context>;
    async fn update(&self, id: i64, input: &ContextInput) -> Result<Context>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct ContextRepositoryImpl {
    pool: MySqlPool,
}

impl ContextRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContextRepository for ContextRepositoryImpl {
    async fn list(&self) -> Result<Vec<Context>> {
        let contexts = sqlx::query_as::<_, Context>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM contexts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(contexts)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Context>> {
        let context = sqlx::query_as::<_, Context>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM contexts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(context)
    }

    async fn create(&self, input: &ContextInput) -> Result<Context> {
        let result = sqlx::query(
            r#"
            INSERT INTO contexts (name, created_at, updated_at)
            VALUES (?, NOW(), NOW())
            "#,
        )
        .bind(&input.name)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create context")))
    }

    async fn update(&self, id: i64, input: &ContextInput) -> Result<Context> {
        sqlx::query(
            r#"
            UPDATE contexts
            SET name = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?;

        self.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM contexts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_restricted_delete(e, "Context"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
