//! Data access layer (Repository pattern)

pub mod context;
pub mod locale;
pub mod lookup;
pub mod session;
pub mod translation;
pub mod user;

pub use context::ContextRepository;
pub use locale::LocaleRepository;
pub use lookup::LookupRepositoryImpl;
pub use session::SessionRepository;
pub use translation::TranslationRepository;
pub use user::UserRepository;

use crate::error::AppError;
use crate::validation::{invalid_selection_message, taken_message, ValidationErrors};

/// How a failed write collided with a store constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintViolation {
    Unique,
    ForeignKey,
}

pub(crate) fn constraint_violation(err: &sqlx::Error) -> Option<ConstraintViolation> {
    let db_err = err.as_database_error()?;
    if db_err.is_unique_violation() {
        Some(ConstraintViolation::Unique)
    } else if db_err.is_foreign_key_violation() {
        Some(ConstraintViolation::ForeignKey)
    } else {
        None
    }
}

/// Map a unique-index violation on insert/update to the validation error
/// for `unique_field`. The index is the final authority when two writers race
/// past the validation pre-check.
pub(crate) fn map_unique_violation(err: sqlx::Error, unique_field: &str) -> AppError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique) => {
            AppError::Validation(ValidationErrors::single(unique_field, taken_message(unique_field)))
        }
        _ => AppError::Database(err),
    }
}

/// Map a foreign-key violation on insert/update to an `exists` error on the
/// referencing column named in the store message.
pub(crate) fn map_reference_violation(err: sqlx::Error, reference_fields: &[&str]) -> AppError {
    if constraint_violation(&err) != Some(ConstraintViolation::ForeignKey) {
        return AppError::Database(err);
    }
    let message = err
        .as_database_error()
        .map(|e| e.message().to_string())
        .unwrap_or_default();

    let mut errors = ValidationErrors::new();
    for field in reference_fields {
        if message.contains(field) {
            errors.add(field, invalid_selection_message(field));
        }
    }
    if errors.is_empty() {
        return AppError::Database(err);
    }
    AppError::Validation(errors)
}

/// Map a foreign-key violation on delete (row still referenced) to a conflict
pub(crate) fn map_restricted_delete(err: sqlx::Error, resource: &str) -> AppError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::ForeignKey) => AppError::Conflict(referenced_message(resource)),
        _ => AppError::Database(err),
    }
}

pub(crate) fn referenced_message(resource: &str) -> String {
    format!("{} is still referenced by translations", resource)
}

/// Escape LIKE wildcards so user input matches as a literal substring
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
