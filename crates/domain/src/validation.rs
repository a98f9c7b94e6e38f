use serde::{Deserialize, Serialize};

use crate::document::DocumentConfig;
use crate::field::{FieldSchema, ValidationRule};
use crate::form_data::FormDataMap;

/// Failure category of a field validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Required value is missing.
    Required,
    /// Value does not match the expected pattern.
    FormatMismatch,
    /// Numeric value is outside the allowed range.
    OutOfRange,
    /// Value is longer than allowed.
    TooLong,
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    field_id: String,
    kind: ValidationErrorKind,
    message: String,
}

impl ValidationError {
    /// Creates a validation error.
    #[must_use]
    pub fn new(
        field_id: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            kind,
            message: message.into(),
        }
    }

    /// Returns the failing field identifier.
    #[must_use]
    pub fn field_id(&self) -> &str {
        self.field_id.as_str()
    }

    /// Returns the failure category.
    #[must_use]
    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Parses user-entered numeric text, tolerating currency and percent decoration.
#[must_use]
pub fn parse_numeric(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|character| !matches!(character, '$' | ',' | '%' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Validates one value against a field schema.
///
/// Rules run in the fixed order `required`, `regex`, `range`, `maxLength`
/// regardless of configured order, and the first failure wins. Optional empty
/// values skip every rule but `required`. Readonly fields are validated too.
#[must_use]
pub fn validate_field(schema: &FieldSchema, value: &str) -> Option<ValidationError> {
    let mut rules: Vec<&ValidationRule> = schema.validation_rules().iter().collect();
    rules.sort_by_key(|rule| rule.evaluation_rank());

    let is_empty = value.trim().is_empty();

    for rule in rules {
        let failure = match rule {
            ValidationRule::Required { .. } => is_empty.then_some(ValidationErrorKind::Required),
            _ if is_empty => None,
            ValidationRule::Regex { pattern, .. } => {
                (!pattern.is_match(value.trim())).then_some(ValidationErrorKind::FormatMismatch)
            }
            ValidationRule::Range { min, max, .. } => {
                let in_range = parse_numeric(value).is_some_and(|number| {
                    min.is_none_or(|min| number >= min) && max.is_none_or(|max| number <= max)
                });
                (!in_range).then_some(ValidationErrorKind::OutOfRange)
            }
            ValidationRule::MaxLength { n, .. } => {
                (value.chars().count() > *n).then_some(ValidationErrorKind::TooLong)
            }
        };

        if let Some(kind) = failure {
            return Some(ValidationError::new(
                schema.id(),
                kind,
                rule.message_for(schema.label()),
            ));
        }
    }

    None
}

/// Validates every field of a config; at most one error per field.
#[must_use]
pub fn validate_form(config: &DocumentConfig, form_data: &FormDataMap) -> Vec<ValidationError> {
    config
        .fields()
        .iter()
        .filter_map(|field| validate_field(field, form_data.text(field.id()).as_ref()))
        .collect()
}
