//! Translation domain model

use super::{Context, Locale};
use crate::error::Result;
use crate::validation::{FieldRule, Table, ValidatedPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A unique key mapped to display content, scoped to one locale and one context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Translation {
    pub id: i64,
    pub key: String,
    pub content: String,
    pub locale_id: i64,
    pub context_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Translation with its locale and context embedded inline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationWithRelations {
    #[serde(flatten)]
    pub translation: Translation,
    pub locale: Locale,
    pub context: Context,
}

/// Writable fields of a translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationInput {
    pub key: String,
    pub content: String,
    pub locale_id: i64,
    pub context_id: i64,
}

impl TranslationInput {
    pub const RULES: &'static [FieldRule] = &[
        FieldRule::text("key")
            .required()
            .unique(Table::Translations, "key"),
        FieldRule::text("content").required(),
        FieldRule::reference("locale_id")
            .required()
            .exists(Table::Locales, "id"),
        FieldRule::reference("context_id")
            .required()
            .exists(Table::Contexts, "id"),
    ];

    pub fn from_validated(payload: &ValidatedPayload) -> Result<Self> {
        Ok(Self {
            key: payload.require_text("key")?,
            content: payload.require_text("content")?,
            locale_id: payload.require_reference("locale_id")?,
            context_id: payload.require_reference("context_id")?,
        })
    }
}

/// Conjunctive search filters. `None` means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationFilter {
    /// Substring of the translation key
    pub key: Option<String>,
    /// Substring of the translation content
    pub content: Option<String>,
    /// Substring of the related context's name
    pub context: Option<String>,
}

impl TranslationFilter {
    /// Build a filter, dropping blank values
    pub fn new(key: Option<&str>, content: Option<&str>, context: Option<&str>) -> Self {
        fn filled(value: Option<&str>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty()).map(str::to_string)
        }

        Self {
            key: filled(key),
            content: filled(content),
            context: filled(context),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.content.is_none() && self.context.is_none()
    }
}

/// Requested page window (1-based page)
///
/// `page` never exceeds `last_addressable(per_page)`, so the offset and the
/// index of the last row on the page always fit in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Self {
        let per_page = per_page.max(1);
        Self {
            page: page.clamp(1, Self::last_addressable(per_page)),
            per_page,
        }
    }

    /// Highest page whose rows can all be numbered
    pub fn last_addressable(per_page: i64) -> i64 {
        i64::MAX / per_page.max(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}
