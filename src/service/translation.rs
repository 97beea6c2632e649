//! Translation business logic

use crate::domain::{
    PageRequest, Translation, TranslationFilter, TranslationInput, TranslationWithRelations,
};
use crate::error::{AppError, Result};
use crate::repository::TranslationRepository;
use crate::validation::{validate, ValidationStore};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// One page of translations plus the number of matches across all pages
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationPage {
    pub items: Vec<TranslationWithRelations>,
    pub total: i64,
    pub page: PageRequest,
}

pub struct TranslationService<R: TranslationRepository, V: ValidationStore> {
    repo: Arc<R>,
    validation_store: Arc<V>,
}

impl<R: TranslationRepository, V: ValidationStore> TranslationService<R, V> {
    pub fn new(repo: Arc<R>, validation_store: Arc<V>) -> Self {
        Self {
            repo,
            validation_store,
        }
    }

    pub async fn list(&self, page: PageRequest) -> Result<TranslationPage> {
        self.search(&TranslationFilter::default(), page).await
    }

    pub async fn search(
        &self,
        filter: &TranslationFilter,
        page: PageRequest,
    ) -> Result<TranslationPage> {
        let (items, total) = self.repo.search(filter, page).await?;
        Ok(TranslationPage { items, total, page })
    }

    pub async fn get(&self, id: i64) -> Result<Translation> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn create(&self, payload: &Map<String, Value>) -> Result<Translation> {
        let validated =
            validate(self.validation_store.as_ref(), TranslationInput::RULES, payload, None)
                .await?;
        let input = TranslationInput::from_validated(&validated)?;

        let translation = self.repo.create(&input).await?;
        info!(
            translation_id = translation.id,
            locale_id = translation.locale_id,
            context_id = translation.context_id,
            "Translation created"
        );
        Ok(translation)
    }

    pub async fn update(&self, id: i64, payload: &Map<String, Value>) -> Result<Translation> {
        self.get(id).await?;

        let validated = validate(
            self.validation_store.as_ref(),
            TranslationInput::RULES,
            payload,
            Some(id),
        )
        .await?;
        let input = TranslationInput::from_validated(&validated)?;

        let translation = self.repo.update(id, &input).await?;
        info!(translation_id = translation.id, "Translation updated");
        Ok(translation)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.get(id).await?;
        self.repo.delete(id).await?;
        info!(translation_id = id, "Translation deleted");
        Ok(())
    }
}
