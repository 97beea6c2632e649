//! Application state traits for dependency injection
//!
//! Handlers are generic over [`HasServices`] so the same router serves the
//! production `AppState` and the in-memory state used by HTTP tests.

use crate::config::Config;
use crate::repository::{
    ContextRepository, LocaleRepository, SessionRepository, TranslationRepository, UserRepository,
};
use crate::service::{AuthService, ContextService, LocaleService, TranslationService};
use crate::validation::ValidationStore;

/// Trait for application state that provides access to all services.
pub trait HasServices: Clone + Send + Sync + 'static {
    /// The context repository type
    type ContextRepo: ContextRepository;
    /// The locale repository type
    type LocaleRepo: LocaleRepository;
    /// The translation repository type
    type TranslationRepo: TranslationRepository;
    /// The user repository type
    type UserRepo: UserRepository;
    /// The session repository type
    type SessionRepo: SessionRepository;
    /// Backing lookups for `unique`/`exists` rules
    type Store: ValidationStore;

    /// Get the application configuration
    fn config(&self) -> &Config;

    fn context_service(&self)
        -> &ContextService<Self::ContextRepo, Self::TranslationRepo, Self::Store>;

    fn locale_service(&self) -> &LocaleService<Self::LocaleRepo, Self::TranslationRepo, Self::Store>;

    fn translation_service(&self) -> &TranslationService<Self::TranslationRepo, Self::Store>;

    fn auth_service(&self) -> &AuthService<Self::UserRepo, Self::SessionRepo>;

    /// Check if the store is reachable
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
