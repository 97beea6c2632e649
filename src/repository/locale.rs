//! Locale repository

use super::{map_restricted_delete, map_unique_violation};
use crate::domain::{Locale, LocaleInput};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocaleRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Locale>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Locale>>;
    async fn create(&self, input: &LocaleInput) -> Result<Locale>;
    async fn update(&self, id: i64, input: &LocaleInput) -> Result<Locale>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct LocaleRepositoryImpl {
    pool: MySqlPool,
}

impl LocaleRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocaleRepository for LocaleRepositoryImpl {
    async fn list(&self) -> Result<Vec<Locale>> {
        let locales = sqlx::query_as::<_, Locale>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM locales
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(locales)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Locale>> {
        let locale = sqlx::query_as::<_, Locale>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM locales
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(locale)
    }

    async fn create(&self, input: &LocaleInput) -> Result<Locale> {
        let result = sqlx::query(
            r#"
            INSERT INTO locales (name, description, created_at, updated_at)
            VALUES (?, ?, NOW(), NOW())
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create locale")))
    }

    async fn update(&self, id: i64, input: &LocaleInput) -> Result<Locale> {
        sqlx::query(
            r#"
            UPDATE locales
            SET name = ?, description = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?;

        self.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM locales WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_restricted_delete(e, "Locale"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
