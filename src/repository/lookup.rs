//! Store lookups backing the `unique` and `exists` validation rules

use crate::error::Result;
use crate::validation::{ColumnRef, ValidationStore};
use async_trait::async_trait;
use sqlx::MySqlPool;

pub struct LookupRepositoryImpl {
    pool: MySqlPool,
}

impl LookupRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

// Table and column names come from static rule tables, never from input.
#[async_trait]
impl ValidationStore for LookupRepositoryImpl {
    async fn value_taken(
        &self,
        column: ColumnRef,
        value: &str,
        except_id: Option<i64>,
    ) -> Result<bool> {
        let row: (i64,) = match except_id {
            Some(id) => {
                let sql = format!(
                    "SELECT COUNT(*) FROM `{}` WHERE `{}` = ? AND id <> ?",
                    column.table, column.column
                );
                sqlx::query_as(&sql)
                    .bind(value)
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT COUNT(*) FROM `{}` WHERE `{}` = ?",
                    column.table, column.column
                );
                sqlx::query_as(&sql).bind(value).fetch_one(&self.pool).await?
            }
        };
        Ok(row.0 > 0)
    }

    async fn row_exists(&self, column: ColumnRef, id: i64) -> Result<bool> {
        let sql = format!(
            "SELECT COUNT(*) FROM `{}` WHERE `{}` = ?",
            column.table, column.column
        );
        let row: (i64,) = sqlx::query_as(&sql).bind(id).fetch_one(&self.pool).await?;
        Ok(row.0 > 0)
    }
}
