//! Translation repository

use super::{like_pattern, map_reference_violation, map_unique_violation};
use crate::domain::{
    Context, Locale, PageRequest, Translation, TranslationFilter, TranslationInput,
    TranslationWithRelations,
};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Translation>>;
    async fn create(&self, input: &TranslationInput) -> Result<Translation>;
    async fn update(&self, id: i64, input: &TranslationInput) -> Result<Translation>;
    async fn delete(&self, id: i64) -> Result<()>;

    /// One page of translations matching `filter`, with relations, plus the
    /// total number of matches.
    async fn search(
        &self,
        filter: &TranslationFilter,
        page: PageRequest,
    ) -> Result<(Vec<TranslationWithRelations>, i64)>;

    async fn count_by_locale(&self, locale_id: i64) -> Result<i64>;
    async fn count_by_context(&self, context_id: i64) -> Result<i64>;
}

pub struct TranslationRepositoryImpl {
    pool: MySqlPool,
}

impl TranslationRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const REFERENCE_FIELDS: &[&str] = &["locale_id", "context_id"];

/// Flat row of the translation/locale/context join
#[derive(Debug, FromRow)]
struct TranslationRow {
    id: i64,
    key: String,
    content: String,
    locale_id: i64,
    context_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    locale_name: String,
    locale_description: Option<String>,
    locale_created_at: DateTime<Utc>,
    locale_updated_at: DateTime<Utc>,
    context_name: String,
    context_created_at: DateTime<Utc>,
    context_updated_at: DateTime<Utc>,
}

impl From<TranslationRow> for TranslationWithRelations {
    fn from(row: TranslationRow) -> Self {
        Self {
            translation: Translation {
                id: row.id,
                key: row.key,
                content: row.content,
                locale_id: row.locale_id,
                context_id: row.context_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            locale: Locale {
                id: row.locale_id,
                name: row.locale_name,
                description: row.locale_description,
                created_at: row.locale_created_at,
                updated_at: row.locale_updated_at,
            },
            context: Context {
                id: row.context_id,
                name: row.context_name,
                created_at: row.context_created_at,
                updated_at: row.context_updated_at,
            },
        }
    }
}

const JOINED_FROM: &str = r#"
    FROM translations t
    INNER JOIN locales l ON l.id = t.locale_id
    INNER JOIN contexts c ON c.id = t.context_id
    WHERE 1 = 1
"#;

fn push_filters(builder: &mut QueryBuilder<'_, MySql>, filter: &TranslationFilter) {
    if let Some(key) = &filter.key {
        builder.push(" AND t.`key` LIKE ").push_bind(like_pattern(key));
    }
    if let Some(content) = &filter.content {
        builder
            .push(" AND t.content LIKE ")
            .push_bind(like_pattern(content));
    }
    if let Some(context) = &filter.context {
        builder.push(" AND c.name LIKE ").push_bind(like_pattern(context));
    }
}

#[async_trait]
impl TranslationRepository for TranslationRepositoryImpl {
    async fn find_by_id(&self, id: i64) -> Result<Option<Translation>> {
        let translation = sqlx::query_as::<_, Translation>(
            r#"
            SELECT id, `key`, content, locale_id, context_id, created_at, updated_at
            FROM translations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(translation)
    }

    async fn create(&self, input: &TranslationInput) -> Result<Translation> {
        let result = sqlx::query(
            r#"
            INSERT INTO translations (`key`, content, locale_id, context_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(&input.key)
        .bind(&input.content)
        .bind(input.locale_id)
        .bind(input.context_id)
        .execute(&self.pool)
        .await
        .map_err(|e| match super::constraint_violation(&e) {
            Some(super::ConstraintViolation::ForeignKey) => {
                map_reference_violation(e, REFERENCE_FIELDS)
            }
            _ => map_unique_violation(e, "key"),
        })?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create translation")))
    }

    async fn update(&self, id: i64, input: &TranslationInput) -> Result<Translation> {
        sqlx::query(
            r#"
            UPDATE translations
            SET `key` = ?, content = ?, locale_id = ?, context_id = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&input.key)
        .bind(&input.content)
        .bind(input.locale_id)
        .bind(input.context_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| match super::constraint_violation(&e) {
            Some(super::ConstraintViolation::ForeignKey) => {
                map_reference_violation(e, REFERENCE_FIELDS)
            }
            _ => map_unique_violation(e, "key"),
        })?;

        self.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM translations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn search(
        &self,
        filter: &TranslationFilter,
        page: PageRequest,
    ) -> Result<(Vec<TranslationWithRelations>, i64)> {
        let mut count_query = QueryBuilder::<MySql>::new("SELECT COUNT(*)");
        count_query.push(JOINED_FROM);
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<MySql>::new(
            r#"
            SELECT t.id, t.`key`, t.content, t.locale_id, t.context_id,
                   t.created_at, t.updated_at,
                   l.name AS locale_name, l.description AS locale_description,
                   l.created_at AS locale_created_at, l.updated_at AS locale_updated_at,
                   c.name AS context_name,
                   c.created_at AS context_created_at, c.updated_at AS context_updated_at
            "#,
        );
        select.push(JOINED_FROM);
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY t.id LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<TranslationRow> = select.build_query_as().fetch_all(&self.pool).await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn count_by_locale(&self, locale_id: i64) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM translations WHERE locale_id = ?")
            .bind(locale_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn count_by_context(&self, context_id: i64) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM translations WHERE context_id = ?")
            .bind(context_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
