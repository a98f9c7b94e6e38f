use std::str::FromStr;

use docforge_core::{AppError, AppResult, NonEmptyString};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Section assigned to fields that do not name one.
pub const DEFAULT_SECTION: &str = "General Information";

/// Supported input kinds for document form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free single-line text.
    Text,
    /// Email address.
    Email,
    /// Telephone number.
    Phone,
    /// Plain number.
    Number,
    /// Percentage value.
    Percentage,
    /// Monetary amount.
    Currency,
    /// Calendar date.
    Date,
    /// One value out of a fixed option list.
    Select,
    /// Multi-line free text.
    Textarea,
}

impl FieldKind {
    /// Returns a stable storage value for the field kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Number => "number",
            Self::Percentage => "percentage",
            Self::Currency => "currency",
            Self::Date => "date",
            Self::Select => "select",
            Self::Textarea => "textarea",
        }
    }

    /// Returns whether values of this kind are numeric.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Percentage | Self::Currency)
    }
}

impl FromStr for FieldKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Self::Text),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "number" => Ok(Self::Number),
            "percentage" => Ok(Self::Percentage),
            "currency" => Ok(Self::Currency),
            "date" => Ok(Self::Date),
            "select" => Ok(Self::Select),
            "textarea" => Ok(Self::Textarea),
            _ => Err(AppError::Validation(format!("unknown field type '{value}'"))),
        }
    }
}

/// UI affordance classification of a field. Independent of validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldBehavior {
    /// Freely editable.
    #[default]
    Editable,
    /// Shown but not editable.
    Readonly,
    /// Editable, flagged as "verify manually".
    Manual,
}

/// One entry of a select field's option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    value: String,
    label: String,
}

impl SelectOption {
    /// Creates a select option.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Returns the stored value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }
}

/// Pattern of a `regex` rule, compiled once when the rule is built.
///
/// A source that does not compile never matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RulePattern {
    source: String,
    compiled: Option<Regex>,
}

impl RulePattern {
    /// Compiles a pattern source.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = Regex::new(source.as_str()).ok();
        Self { source, compiled }
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.source.as_str()
    }

    /// Returns whether the source compiled.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.compiled.is_some()
    }

    /// Returns whether the value matches the compiled pattern.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.compiled
            .as_ref()
            .is_some_and(|regex| regex.is_match(value))
    }
}

impl PartialEq for RulePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl From<String> for RulePattern {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl From<RulePattern> for String {
    fn from(pattern: RulePattern) -> Self {
        pattern.source
    }
}

/// Declarative validation rule attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationRule {
    /// Value must not be empty.
    Required {
        /// Message shown when the rule fails.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Value must match a regular expression.
    Regex {
        /// Regular expression, compiled on construction.
        pattern: RulePattern,
        /// Message shown when the rule fails.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Numeric value must fall inside an inclusive range.
    Range {
        /// Inclusive lower bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Inclusive upper bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        /// Message shown when the rule fails.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Value must not exceed a number of characters.
    MaxLength {
        /// Maximum number of characters.
        n: usize,
        /// Message shown when the rule fails.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl ValidationRule {
    /// Creates a required rule with a custom message.
    #[must_use]
    pub fn required(message: impl Into<String>) -> Self {
        Self::Required {
            message: Some(message.into()),
        }
    }

    /// Creates a regex rule with a custom message.
    #[must_use]
    pub fn regex(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Regex {
            pattern: RulePattern::new(pattern),
            message: Some(message.into()),
        }
    }

    /// Creates a range rule with a custom message.
    #[must_use]
    pub fn range(min: Option<f64>, max: Option<f64>, message: impl Into<String>) -> Self {
        Self::Range {
            min,
            max,
            message: Some(message.into()),
        }
    }

    /// Creates a max-length rule with a custom message.
    #[must_use]
    pub fn max_length(n: usize, message: impl Into<String>) -> Self {
        Self::MaxLength {
            n,
            message: Some(message.into()),
        }
    }

    /// Returns the stable rule kind value.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Required { .. } => "required",
            Self::Regex { .. } => "regex",
            Self::Range { .. } => "range",
            Self::MaxLength { .. } => "maxLength",
        }
    }

    /// Position in the fixed evaluation order.
    #[must_use]
    pub fn evaluation_rank(&self) -> u8 {
        match self {
            Self::Required { .. } => 0,
            Self::Regex { .. } => 1,
            Self::Range { .. } => 2,
            Self::MaxLength { .. } => 3,
        }
    }

    /// Returns the configured message or a default built from the field label.
    #[must_use]
    pub fn message_for(&self, label: &str) -> String {
        let configured = match self {
            Self::Required { message }
            | Self::Regex { message, .. }
            | Self::Range { message, .. }
            | Self::MaxLength { message, .. } => message.as_deref(),
        };

        if let Some(message) = configured.filter(|message| !message.trim().is_empty()) {
            return message.to_owned();
        }

        match self {
            Self::Required { .. } => format!("{label} is required"),
            Self::Regex { .. } => format!("{label} has an invalid format"),
            Self::Range { min, max, .. } => match (min, max) {
                (Some(min), Some(max)) => format!("{label} must be between {min} and {max}"),
                (Some(min), None) => format!("{label} must be at least {min}"),
                (None, Some(max)) => format!("{label} must be at most {max}"),
                (None, None) => format!("{label} must be a number"),
            },
            Self::MaxLength { n, .. } => format!("{label} must be at most {n} characters"),
        }
    }
}

fn default_section() -> String {
    DEFAULT_SECTION.to_owned()
}

/// Declarative description of one form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    id: NonEmptyString,
    label: NonEmptyString,
    #[serde(rename = "type")]
    kind: FieldKind,
    #[serde(default = "default_section")]
    section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(default)]
    behavior: FieldBehavior,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<SelectOption>,
    #[serde(default)]
    validation_rules: Vec<ValidationRule>,
}

impl FieldSchema {
    /// Creates a validated editable field in the default section.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
    ) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            label: NonEmptyString::new(label)?,
            kind,
            section: default_section(),
            placeholder: None,
            behavior: FieldBehavior::Editable,
            options: Vec::new(),
            validation_rules: Vec::new(),
        })
    }

    /// Places the field in a named section. Blank names fall back to the default.
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        let section = section.into();
        let trimmed = section.trim();
        self.section = if trimmed.is_empty() {
            default_section()
        } else {
            trimmed.to_owned()
        };
        self
    }

    /// Sets the input placeholder.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the UI behavior.
    #[must_use]
    pub fn with_behavior(mut self, behavior: FieldBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Sets the select options.
    #[must_use]
    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    /// Appends a validation rule.
    #[must_use]
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.push(rule);
        self
    }

    /// Returns the field identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the section name, never blank.
    #[must_use]
    pub fn section(&self) -> &str {
        let trimmed = self.section.trim();
        if trimmed.is_empty() {
            DEFAULT_SECTION
        } else {
            trimmed
        }
    }

    /// Returns the placeholder, if any.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Returns the UI behavior.
    #[must_use]
    pub fn behavior(&self) -> FieldBehavior {
        self.behavior
    }

    /// Returns select options.
    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Returns validation rules in configured order.
    #[must_use]
    pub fn validation_rules(&self) -> &[ValidationRule] {
        &self.validation_rules
    }

    /// Returns whether a `required` rule is present.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.validation_rules
            .iter()
            .any(|rule| matches!(rule, ValidationRule::Required { .. }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        DEFAULT_SECTION, FieldBehavior, FieldKind, FieldSchema, RulePattern, ValidationRule,
    };

    #[test]
    fn field_schema_parses_config_payload_with_defaults() {
        let payload = json!({
            "id": "contractNumber",
            "label": "Contract Number",
            "type": "text",
            "validationRules": [
                { "kind": "required", "message": "Contract number is required" },
                { "kind": "regex", "pattern": "^GS-", "message": "Must start with GS-" }
            ],
            "unknownKey": true
        });

        let field: FieldSchema =
            serde_json::from_value(payload).unwrap_or_else(|_| unreachable!());

        assert_eq!(field.id(), "contractNumber");
        assert_eq!(field.kind(), FieldKind::Text);
        assert_eq!(field.section(), DEFAULT_SECTION);
        assert_eq!(field.behavior(), FieldBehavior::Editable);
        assert!(field.is_required());
        assert_eq!(field.validation_rules().len(), 2);
    }

    #[test]
    fn field_schema_rejects_blank_id() {
        let payload = json!({ "id": " ", "label": "Name", "type": "text" });
        let result = serde_json::from_value::<FieldSchema>(payload);
        assert!(result.is_err());
    }

    #[test]
    fn required_marker_follows_rule_presence() {
        let field = FieldSchema::new("name", "Name", FieldKind::Text)
            .unwrap_or_else(|_| unreachable!())
            .with_rule(ValidationRule::max_length(10, "too long"));
        assert!(!field.is_required());

        let field = field.with_rule(ValidationRule::required("needed"));
        assert!(field.is_required());
    }

    #[test]
    fn default_messages_mention_the_label() {
        let rule = ValidationRule::Range {
            min: Some(0.0),
            max: Some(100.0),
            message: None,
        };
        assert_eq!(rule.message_for("Discount"), "Discount must be between 0 and 100");
    }

    #[test]
    fn blank_section_falls_back_to_default() {
        let field = FieldSchema::new("name", "Name", FieldKind::Text)
            .unwrap_or_else(|_| unreachable!())
            .with_section("   ");
        assert_eq!(field.section(), DEFAULT_SECTION);
    }

    #[test]
    fn regex_rules_are_compiled_when_parsed() {
        let rules: Vec<ValidationRule> = serde_json::from_value(json!([
            { "kind": "regex", "pattern": "^GS-\\d{2}F-\\w+$" },
            { "kind": "regex", "pattern": "(unclosed" }
        ]))
        .unwrap_or_else(|_| unreachable!());

        assert!(matches!(
            &rules[0],
            ValidationRule::Regex { pattern, .. }
                if pattern.is_valid() && pattern.is_match("GS-35F-0119Y")
        ));
        assert!(matches!(
            &rules[1],
            ValidationRule::Regex { pattern, .. }
                if !pattern.is_valid() && !pattern.is_match("(unclosed")
        ));

        let serialized = serde_json::to_value(&rules[1]).unwrap_or_else(|_| unreachable!());
        assert_eq!(serialized["pattern"], "(unclosed");
    }

    #[test]
    fn patterns_compare_by_source() {
        assert_eq!(RulePattern::new("^GS-"), RulePattern::from("^GS-".to_owned()));
        assert_ne!(RulePattern::new("^GS-"), RulePattern::new("^GSA-"));
    }
}
