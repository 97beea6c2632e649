//! Locale business logic

use crate::domain::{Locale, LocaleInput};
use crate::error::{AppError, Result};
use crate::repository::{referenced_message, LocaleRepository, TranslationRepository};
use crate::validation::{validate, ValidationStore};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

pub const LOCALE_NOT_FOUND: &str = "Locale not found";

pub struct LocaleService<R: LocaleRepository, T: TranslationRepository, V: ValidationStore> {
    repo: Arc<R>,
    translation_repo: Arc<T>,
    validation_store: Arc<V>,
}

impl<R: LocaleRepository, T: TranslationRepository, V: ValidationStore> LocaleService<R, T, V> {
    pub fn new(repo: Arc<R>, translation_repo: Arc<T>, validation_store: Arc<V>) -> Self {
        Self {
            repo,
            translation_repo,
            validation_store,
        }
    }

    pub async fn list(&self) -> Result<Vec<Locale>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Locale> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn create(&self, payload: &Map<String, Value>) -> Result<Locale> {
        let validated =
            validate(self.validation_store.as_ref(), LocaleInput::RULES, payload, None).await?;
        let input = LocaleInput::from_validated(&validated)?;

        let locale = self.repo.create(&input).await?;
        info!(locale_id = locale.id, name = %locale.name, "Locale created");
        Ok(locale)
    }

    /// Load a locale about to be overwritten. A missing id reports
    /// `Locale not found` in the body.
    pub async fn get_for_update(&self, id: i64) -> Result<Locale> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFoundMessage(LOCALE_NOT_FOUND.to_string()))
    }

    pub async fn update(&self, id: i64, payload: &Map<String, Value>) -> Result<Locale> {
        self.get_for_update(id).await?;

        let validated =
            validate(self.validation_store.as_ref(), LocaleInput::RULES, payload, Some(id)).await?;
        let input = LocaleInput::from_validated(&validated)?;

        let locale = self.repo.update(id, &input).await?;
        info!(locale_id = locale.id, "Locale updated");
        Ok(locale)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.get(id).await?;

        if self.translation_repo.count_by_locale(id).await? > 0 {
            return Err(AppError::Conflict(referenced_message("Locale")));
        }

        self.repo.delete(id).await?;
        info!(locale_id = id, "Locale deleted");
        Ok(())
    }
}
