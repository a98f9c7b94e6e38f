use docforge_domain::{
    DocumentConfig, FieldBehavior, FieldKind, FieldSchema, FormDataMap, SelectOption,
    ValidationError,
};
use serde::Serialize;

/// Glyph appended to labels of fields carrying a `required` rule.
pub const REQUIRED_MARKER: &str = "*";

/// Keyboard/format hint for single-line inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputHint {
    /// Free text.
    Text,
    /// Numeric keypad.
    Number,
    /// Email keyboard.
    Email,
    /// Telephone keypad.
    Tel,
}

/// Input control chosen for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum FieldControl {
    /// One-line input.
    SingleLine {
        /// Keyboard hint.
        hint: InputHint,
    },
    /// Multi-line text area.
    MultiLine,
    /// Enumerated dropdown.
    Dropdown {
        /// Placeholder entry shown before a choice is made.
        placeholder: String,
        /// Selectable options.
        options: Vec<SelectOption>,
    },
    /// Date picker.
    DatePicker,
}

impl FieldControl {
    /// Maps a field schema to its control. Total over [`FieldKind`].
    #[must_use]
    pub fn for_field(field: &FieldSchema) -> Self {
        match field.kind() {
            FieldKind::Textarea => Self::MultiLine,
            FieldKind::Select => Self::Dropdown {
                placeholder: format!("Select {}", field.label()),
                options: field.options().to_vec(),
            },
            FieldKind::Date => Self::DatePicker,
            FieldKind::Number | FieldKind::Percentage | FieldKind::Currency => Self::SingleLine {
                hint: InputHint::Number,
            },
            FieldKind::Email => Self::SingleLine {
                hint: InputHint::Email,
            },
            FieldKind::Phone => Self::SingleLine {
                hint: InputHint::Tel,
            },
            FieldKind::Text => Self::SingleLine {
                hint: InputHint::Text,
            },
        }
    }
}

/// Render model of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    /// Field identifier.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Required glyph, present iff a `required` rule exists.
    pub required_marker: Option<&'static str>,
    /// Control to render.
    #[serde(flatten)]
    pub control: FieldControl,
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Current value as text.
    pub value: String,
    /// Input is disabled.
    pub disabled: bool,
    /// Muted styling for readonly fields.
    pub muted: bool,
    /// "Verify manually" indicator.
    pub manual_indicator: bool,
    /// Current validation message.
    pub error: Option<String>,
}

/// Render model of one section tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormTabView {
    /// Section name.
    pub section: String,
    /// Whether any field in the tab has an unresolved error.
    pub has_errors: bool,
    /// Fields in config order.
    pub fields: Vec<FieldView>,
}

/// Render model of the whole dynamic form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    /// Active document type.
    pub document_type_id: String,
    /// Active document type name.
    pub document_name: String,
    /// One tab per section, in encounter order.
    pub tabs: Vec<FormTabView>,
}

/// Projects a document config, its values and its errors into a form view.
#[must_use]
pub fn render_form(
    config: &DocumentConfig,
    form_data: &FormDataMap,
    errors: &[ValidationError],
) -> FormView {
    let tabs = config
        .sections()
        .into_iter()
        .map(|section| {
            let fields: Vec<FieldView> = section
                .fields
                .into_iter()
                .map(|field| render_field(field, form_data, errors))
                .collect();

            FormTabView {
                section: section.name.to_owned(),
                has_errors: fields.iter().any(|field| field.error.is_some()),
                fields,
            }
        })
        .collect();

    FormView {
        document_type_id: config.id().to_owned(),
        document_name: config.name().to_owned(),
        tabs,
    }
}

fn render_field(
    field: &FieldSchema,
    form_data: &FormDataMap,
    errors: &[ValidationError],
) -> FieldView {
    let behavior = field.behavior();

    FieldView {
        id: field.id().to_owned(),
        label: field.label().to_owned(),
        required_marker: field.is_required().then_some(REQUIRED_MARKER),
        control: FieldControl::for_field(field),
        placeholder: field.placeholder().map(str::to_owned),
        value: form_data.text(field.id()).into_owned(),
        disabled: behavior == FieldBehavior::Readonly,
        muted: behavior == FieldBehavior::Readonly,
        manual_indicator: behavior == FieldBehavior::Manual,
        error: errors
            .iter()
            .find(|error| error.field_id() == field.id())
            .map(|error| error.message().to_owned()),
    }
}
