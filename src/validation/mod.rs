//! Rule-driven payload validation
//!
//! Every writable resource declares a static table of [`FieldRule`]s. A single
//! generic [`validate`] function evaluates any table against a JSON payload,
//! consulting a [`ValidationStore`] for the `unique` and `exists` rules, and
//! either returns the validated field set or a full [`ValidationErrors`]
//! report covering every failing field.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Tables that validation rules may look into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Contexts,
    Locales,
    Translations,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Contexts => "contexts",
            Table::Locales => "locales",
            Table::Translations => "translations",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected shape of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string
    Text,
    /// A row identity: a JSON integer or a string of digits
    Reference,
}

/// Column a store rule is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: Table,
    pub column: &'static str,
}

/// Validation rules for a single payload field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
    pub unique: Option<ColumnRef>,
    pub exists: Option<ColumnRef>,
}

impl FieldRule {
    pub const fn text(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldKind::Text,
            required: false,
            nullable: false,
            unique: None,
            exists: None,
        }
    }

    pub const fn reference(field: &'static str) -> Self {
        Self {
            kind: FieldKind::Reference,
            ..Self::text(field)
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    pub const fn unique(self, table: Table, column: &'static str) -> Self {
        Self {
            unique: Some(ColumnRef { table, column }),
            ..self
        }
    }

    pub const fn exists(self, table: Table, column: &'static str) -> Self {
        Self {
            exists: Some(ColumnRef { table, column }),
            ..self
        }
    }
}

/// Store lookups needed by the `unique` and `exists` rules
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValidationStore: Send + Sync {
    /// Whether any row other than `except_id` holds `value` in `column`
    async fn value_taken(
        &self,
        column: ColumnRef,
        value: &str,
        except_id: Option<i64>,
    ) -> Result<bool>;

    /// Whether a row with `id` in `column` exists
    async fn row_exists(&self, column: ColumnRef, id: i64) -> Result<bool>;
}

/// Field name → ordered violation messages, in rule-table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report containing one message for one field
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field.to_string(), vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, messages) in &self.fields {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        f.write_str(&rendered.join("; "))
    }
}

/// A value that passed its field's rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Reference(i64),
    Null,
}

/// Validated, type-coerced field set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedPayload {
    values: BTreeMap<&'static str, FieldValue>,
}

impl ValidatedPayload {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Text value of a field, `None` when it validated as absent/null
    pub fn text(&self, field: &str) -> Option<String> {
        match self.values.get(field) {
            Some(FieldValue::Text(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn require_text(&self, field: &str) -> Result<String> {
        self.text(field).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("validated payload has no text field '{}'", field))
        })
    }

    pub fn require_reference(&self, field: &str) -> Result<i64> {
        match self.values.get(field) {
            Some(FieldValue::Reference(id)) => Ok(*id),
            _ => Err(AppError::Internal(anyhow::anyhow!(
                "validated payload has no reference field '{}'",
                field
            ))),
        }
    }
}

/// Human-readable attribute name used in messages (`locale_id` → `locale id`)
pub fn attribute_name(field: &str) -> String {
    field.replace('_', " ")
}

pub fn required_message(field: &str) -> String {
    format!("The {} field is required.", attribute_name(field))
}

pub fn string_message(field: &str) -> String {
    format!("The {} field must be a string.", attribute_name(field))
}

pub fn taken_message(field: &str) -> String {
    format!("The {} has already been taken.", attribute_name(field))
}

pub fn invalid_selection_message(field: &str) -> String {
    format!("The selected {} is invalid.", attribute_name(field))
}

fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn as_reference(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}

/// Evaluate `rules` against `payload`.
///
/// Every field is checked and every violation is reported. `except_id`
/// excludes the row being updated from its own `unique` checks.
pub async fn validate<V>(
    store: &V,
    rules: &[FieldRule],
    payload: &Map<String, Value>,
    except_id: Option<i64>,
) -> Result<ValidatedPayload>
where
    V: ValidationStore + ?Sized,
{
    let mut errors = ValidationErrors::new();
    let mut validated = ValidatedPayload::default();

    for rule in rules {
        let raw = payload.get(rule.field);

        if is_empty_value(raw) {
            if rule.required {
                errors.add(rule.field, required_message(rule.field));
            } else if rule.nullable {
                validated.values.insert(rule.field, FieldValue::Null);
            }
            continue;
        }
        let Some(raw) = raw else { continue };

        let value = match rule.kind {
            FieldKind::Text => match raw {
                Value::String(s) => FieldValue::Text(s.trim().to_string()),
                _ => {
                    errors.add(rule.field, string_message(rule.field));
                    continue;
                }
            },
            FieldKind::Reference => match as_reference(raw) {
                Some(id) => FieldValue::Reference(id),
                None => {
                    errors.add(rule.field, invalid_selection_message(rule.field));
                    continue;
                }
            },
        };

        let mut field_ok = true;

        if let Some(column) = rule.unique {
            let needle = match &value {
                FieldValue::Text(s) => s.clone(),
                FieldValue::Reference(id) => id.to_string(),
                FieldValue::Null => String::new(),
            };
            if store.value_taken(column, &needle, except_id).await? {
                errors.add(rule.field, taken_message(rule.field));
                field_ok = false;
            }
        }

        if let (Some(column), FieldValue::Reference(id)) = (rule.exists, &value) {
            if !store.row_exists(column, *id).await? {
                errors.add(rule.field, invalid_selection_message(rule.field));
                field_ok = false;
            }
        }

        if field_ok {
            validated.values.insert(rule.field, value);
        }
    }

    if errors.is_empty() {
        Ok(validated)
    } else {
        Err(AppError::Validation(errors))
    }
}
