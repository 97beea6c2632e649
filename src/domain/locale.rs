//! Locale domain model

use crate::error::Result;
use crate::validation::{FieldRule, Table, ValidatedPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Language/region identifier (e.g. "en")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Locale {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable fields of a locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleInput {
    pub name: String,
    pub description: Option<String>,
}

impl LocaleInput {
    pub const RULES: &'static [FieldRule] = &[
        FieldRule::text("name")
            .required()
            .unique(Table::Locales, "name"),
        FieldRule::text("description").nullable(),
    ];

    pub fn from_validated(payload: &ValidatedPayload) -> Result<Self> {
        Ok(Self {
            name: payload.require_text("name")?,
            description: payload.text("description"),
        })
    }
}
