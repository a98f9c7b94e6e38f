use docforge_application::{DocumentPreview, FormView, SessionSnapshot};
use docforge_domain::{
    DocumentAst, DocumentTypeSummary, FormValue, GeneratedDocumentMetadata, GenerationStatus,
    ValidationError, ValidationErrorKind,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Selectable document type.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/document-type-response.ts"
)]
pub struct DocumentTypeResponse {
    pub id: String,
    pub name: String,
    pub icon: String,
}

impl From<DocumentTypeSummary> for DocumentTypeResponse {
    fn from(value: DocumentTypeSummary) -> Self {
        Self {
            id: value.id().to_owned(),
            name: value.name().to_owned(),
            icon: value.icon().to_owned(),
        }
    }
}

/// Field-level validation failure.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/validation-error-response.ts"
)]
pub struct ValidationErrorResponse {
    pub field_id: String,
    #[ts(type = "\"required\" | \"format_mismatch\" | \"out_of_range\" | \"too_long\"")]
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl From<ValidationError> for ValidationErrorResponse {
    fn from(value: ValidationError) -> Self {
        Self {
            field_id: value.field_id().to_owned(),
            kind: value.kind(),
            message: value.message().to_owned(),
        }
    }
}

/// Workflow state of one generation session.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/session-response.ts"
)]
pub struct SessionResponse {
    pub session_id: String,
    pub step: String,
    pub step_number: u8,
    pub document_type_id: Option<String>,
    pub job_id: Option<String>,
    pub config_load_error: Option<String>,
    pub errors: Vec<ValidationErrorResponse>,
    #[ts(type = "Record<string, unknown> | null")]
    pub form: Option<FormView>,
    pub editing: bool,
    pub has_downloaded: bool,
    pub generated_count: usize,
}

impl From<SessionSnapshot> for SessionResponse {
    fn from(value: SessionSnapshot) -> Self {
        Self {
            session_id: value.session_id.to_string(),
            step: value.step.as_str().to_owned(),
            step_number: value.step.ordinal(),
            document_type_id: value.document_type_id,
            job_id: value.job_id,
            config_load_error: value.config_load_error,
            errors: value
                .errors
                .into_iter()
                .map(ValidationErrorResponse::from)
                .collect(),
            form: value.form,
            editing: value.editing,
            has_downloaded: value.has_downloaded,
            generated_count: value.generated_count,
        }
    }
}

/// Outcome of asking to leave form entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/preview-gate-response.ts"
)]
pub struct PreviewGateResponse {
    pub advanced: bool,
    pub error_count: usize,
    pub session: SessionResponse,
}

/// Rendered letter on the preview surface.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/document-preview-response.ts"
)]
pub struct DocumentPreviewResponse {
    #[ts(type = "Record<string, unknown>")]
    pub document: DocumentAst,
    pub html: String,
    pub editing: bool,
}

impl From<DocumentPreview> for DocumentPreviewResponse {
    fn from(value: DocumentPreview) -> Self {
        Self {
            document: value.document,
            html: value.html,
            editing: value.editing,
        }
    }
}

/// Entry of the session's generated-document history.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/generated-document-response.ts"
)]
pub struct GeneratedDocumentResponse {
    pub id: String,
    pub document_type_id: String,
    pub file_name: String,
    pub version: u32,
    pub generated_by: String,
    pub generated_at: String,
    #[ts(type = "\"generated\" | \"regenerated\"")]
    pub status: GenerationStatus,
}

impl From<GeneratedDocumentMetadata> for GeneratedDocumentResponse {
    fn from(value: GeneratedDocumentMetadata) -> Self {
        Self {
            id: value.id().to_string(),
            document_type_id: value.document_type_id().to_owned(),
            file_name: value.file_name().to_owned(),
            version: value.version(),
            generated_by: value.generated_by().to_owned(),
            generated_at: value.generated_at().to_rfc3339(),
            status: value.status(),
        }
    }
}

/// Prompt returned when a repeat download needs confirmation.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/download-prompt-response.ts"
)]
pub struct DownloadPromptResponse {
    pub confirm_required: bool,
    pub message: String,
}

/// Incoming payload for document type selection.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/select-document-type-request.ts"
)]
pub struct SelectDocumentTypeRequest {
    pub document_type_id: String,
    #[serde(default)]
    pub job_id: Option<String>,
}

/// Incoming payload for a field edit.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-field-request.ts"
)]
pub struct UpdateFieldRequest {
    #[ts(type = "string | number")]
    pub value: FormValue,
}

/// Incoming rich-text edit.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/apply-edit-request.ts"
)]
pub struct ApplyEditRequest {
    #[ts(type = "Record<string, unknown>")]
    pub document: DocumentAst,
}

/// Incoming Edit/Done toggle.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/set-editing-request.ts"
)]
pub struct SetEditingRequest {
    pub editing: bool,
}

/// Incoming download click.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/download-request.ts"
)]
pub struct DownloadRequest {
    #[serde(default)]
    pub confirm_repeat: bool,
}

#[cfg(test)]
mod tests {
    use docforge_application::SessionSnapshot;
    use docforge_core::SessionId;
    use docforge_domain::{FormValue, ValidationError, ValidationErrorKind, WorkflowStep};

    use super::{DownloadRequest, SessionResponse, UpdateFieldRequest};

    #[test]
    fn session_response_exposes_step_name_and_number() {
        let snapshot = SessionSnapshot {
            session_id: SessionId::new(),
            step: WorkflowStep::FormEntry,
            document_type_id: Some("addition".to_owned()),
            job_id: None,
            config_load_error: None,
            errors: vec![ValidationError::new(
                "contractNumber",
                ValidationErrorKind::Required,
                "Contract Number is required",
            )],
            form: None,
            editing: false,
            has_downloaded: false,
            generated_count: 0,
        };

        let response = SessionResponse::from(snapshot);
        assert_eq!(response.step, "form-entry");
        assert_eq!(response.step_number, 3);
        assert_eq!(response.errors[0].field_id, "contractNumber");

        let json = serde_json::to_value(&response).unwrap_or_else(|_| unreachable!());
        assert_eq!(json["errors"][0]["kind"], "required");
    }

    #[test]
    fn field_values_accept_text_and_numbers() {
        let text: UpdateFieldRequest =
            serde_json::from_str(r#"{"value":"GS-35F-0119Y"}"#).unwrap_or_else(|_| unreachable!());
        let number: UpdateFieldRequest =
            serde_json::from_str(r#"{"value":12.5}"#).unwrap_or_else(|_| unreachable!());

        assert_eq!(text.value, FormValue::from("GS-35F-0119Y"));
        assert_eq!(number.value, FormValue::from(12.5));
    }

    #[test]
    fn download_confirmation_defaults_to_false() {
        let request: DownloadRequest =
            serde_json::from_str("{}").unwrap_or_else(|_| unreachable!());
        assert!(!request.confirm_repeat);
    }
}
