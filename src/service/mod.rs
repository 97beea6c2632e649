//! Business logic layer

pub mod auth;
pub mod context;
pub mod locale;
pub mod translation;

pub use auth::AuthService;
pub use context::ContextService;
pub use locale::LocaleService;
pub use translation::TranslationService;
