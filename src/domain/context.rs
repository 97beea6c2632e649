//! Context domain model

use crate::error::Result;
use crate::validation::{FieldRule, Table, ValidatedPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Named grouping tag attached to translations (e.g. "mobile", "web")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Context {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable fields of a context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInput {
    pub name: String,
}

impl ContextInput {
    pub const RULES: &'static [FieldRule] = &[FieldRule::text("name")
        .required()
        .unique(Table::Contexts, "name")];

    pub fn from_validated(payload: &ValidatedPayload) -> Result<Self> {
        Ok(Self {
            name: payload.require_text("name")?,
        })
    }
}
