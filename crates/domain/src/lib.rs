//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod document;
mod document_ast;
mod field;
mod form_data;
mod generation;
mod validation;
mod workflow;

pub use document::{DocumentConfig, DocumentTypeRegistry, DocumentTypeSummary, FieldSection};
pub use document_ast::{BlockNode, DocumentAst, HeadingAttrs, InlineNode, Mark, MarkSet};
pub use field::{
    DEFAULT_SECTION, FieldBehavior, FieldKind, FieldSchema, RulePattern, SelectOption,
    ValidationRule,
};
pub use form_data::{FormDataMap, FormValue};
pub use generation::{GeneratedDocumentMetadata, GenerationStatus};
pub use validation::{
    ValidationError, ValidationErrorKind, parse_numeric, validate_field, validate_form,
};
pub use workflow::WorkflowStep;
