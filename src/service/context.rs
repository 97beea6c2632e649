//! Context business logic

use crate::domain::{Context, ContextInput};
use crate::error::{AppError, Result};
use crate::repository::{referenced_message, ContextRepository, TranslationRepository};
use crate::validation::{validate, ValidationStore};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

pub struct ContextService<R: ContextRepository, T: TranslationRepository, V: ValidationStore> {
    repo: Arc<R>,
    translation_repo: Arc<T>,
    validation_store: Arc<V>,
}

impl<R: ContextRepository, T: TranslationRepository, V: ValidationStore> ContextService<R, T, V> {
    pub fn new(repo: Arc<R>, translation_repo: Arc<T>, validation_store: Arc<V>) -> Self {
        Self {
            repo,
            translation_repo,
            validation_store,
        }
    }

    pub async fn list(&self) -> Result<Vec<Context>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Context> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn create(&self, payload: &Map<String, Value>) -> Result<Context> {
        let validated =
            validate(self.validation_store.as_ref(), ContextInput::RULES, payload, None).await?;
        let input = ContextInput::from_validated(&validated)?;

        let context = self.repo.create(&input).await?;
        info!(context_id = context.id, name = %context.name, "Context created");
        Ok(context)
    }

    pub async fn update(&self, id: i64, payload: &Map<String, Value>) -> Result<Context> {
        self.get(id).await?;

        let validated =
            validate(self.validation_store.as_ref(), ContextInput::RULES, payload, Some(id)).await?;
        let input = ContextInput::from_validated(&validated)?;

        let context = self.repo.update(id, &input).await?;
        info!(context_id = context.id, "Context updated");
        Ok(context)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.get(id).await?;

        if self.translation_repo.count_by_context(id).await? > 0 {
            return Err(AppError::Conflict(referenced_message("Context")));
        }

        self.repo.delete(id).await?;
        info!(context_id = id, "Context deleted");
        Ok(())
    }
}
