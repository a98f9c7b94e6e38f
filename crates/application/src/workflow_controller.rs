use docforge_core::{AppError, AppResult, OperatorIdentity};
use docforge_domain::{
    DocumentAst, DocumentConfig, FieldBehavior, FormDataMap, FormValue,
    GeneratedDocumentMetadata, GenerationStatus, ValidationError, WorkflowStep, validate_field,
    validate_form,
};
use tracing::{info, warn};

use crate::document_ports::LogoSizing;
use crate::export_service::{ExportOptions, ExportedDocument};
use crate::form_renderer::{FormView, render_form};
use crate::rich_text::RichTextSurface;
use crate::template_renderer::TemplateKind;

/// Config fetch the caller must perform outside the workflow lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLoadRequest {
    /// Document type to load.
    pub document_type_id: String,
    /// Optional job the config is pre-populated from.
    pub job_id: Option<String>,
    generation: u64,
}

/// Result of asking to leave form entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewGate {
    /// The form was valid and the preview was rendered.
    Advanced,
    /// The form has errors; the step did not change.
    Blocked {
        /// Number of fields with an error.
        error_count: usize,
    },
}

/// Export the caller must perform outside the workflow lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Document snapshot taken when the download was requested.
    pub document: DocumentAst,
    /// Export settings.
    pub options: ExportOptions,
    /// Status recorded on success.
    pub status: GenerationStatus,
}

/// Result of a download click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadDecision {
    /// Proceed with the export.
    Export(Box<ExportRequest>),
    /// A document was already downloaded; ask before exporting again.
    ConfirmRepeat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Selection {
    document_type_id: String,
    job_id: Option<String>,
    template: TemplateKind,
}

/// Per-session document generation workflow.
///
/// Owns the selected document type, the loaded config, form data, validation
/// errors and the rich-text surface. Every step change goes through one of the
/// named transition methods; a transition that is not legal from the current
/// step returns [`AppError::Conflict`] and leaves the state untouched.
#[derive(Debug, Clone)]
pub struct DocumentWorkflow {
    operator: OperatorIdentity,
    logo_url: Option<String>,
    step: WorkflowStep,
    selection: Option<Selection>,
    load_generation: u64,
    config: Option<DocumentConfig>,
    config_load_error: Option<String>,
    form_data: FormDataMap,
    errors: Vec<ValidationError>,
    surface: Option<RichTextSurface>,
    file_stem: String,
    logo_sizing: LogoSizing,
    has_downloaded: bool,
    history: Vec<GeneratedDocumentMetadata>,
}

impl DocumentWorkflow {
    /// Creates a workflow at the type-selection step.
    #[must_use]
    pub fn new(operator: OperatorIdentity, logo_url: Option<String>) -> Self {
        Self {
            operator,
            logo_url,
            step: WorkflowStep::SelectType,
            selection: None,
            load_generation: 0,
            config: None,
            config_load_error: None,
            form_data: FormDataMap::new(),
            errors: Vec::new(),
            surface: None,
            file_stem: String::new(),
            logo_sizing: LogoSizing::default(),
            has_downloaded: false,
            history: Vec::new(),
        }
    }

    /// Returns the operator owning the workflow.
    #[must_use]
    pub fn operator(&self) -> &OperatorIdentity {
        &self.operator
    }

    /// Returns the current step.
    #[must_use]
    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    /// Returns the selected document type.
    #[must_use]
    pub fn document_type_id(&self) -> Option<&str> {
        self.selection
            .as_ref()
            .map(|selection| selection.document_type_id.as_str())
    }

    /// Returns the job the form was pre-populated from.
    #[must_use]
    pub fn job_id(&self) -> Option<&str> {
        self.selection
            .as_ref()
            .and_then(|selection| selection.job_id.as_deref())
    }

    /// Returns the loaded config.
    #[must_use]
    pub fn config(&self) -> Option<&DocumentConfig> {
        self.config.as_ref()
    }

    /// Returns the last config-load failure message.
    #[must_use]
    pub fn config_load_error(&self) -> Option<&str> {
        self.config_load_error.as_deref()
    }

    /// Returns the entered values.
    #[must_use]
    pub fn form_data(&self) -> &FormDataMap {
        &self.form_data
    }

    /// Returns the published validation errors.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Projects the active config into a form view.
    #[must_use]
    pub fn form_view(&self) -> Option<FormView> {
        self.config
            .as_ref()
            .map(|config| render_form(config, &self.form_data, &self.errors))
    }

    /// Returns the rendered document, once in preview.
    #[must_use]
    pub fn document(&self) -> Option<&DocumentAst> {
        self.surface.as_ref().and_then(RichTextSurface::document)
    }

    /// Returns whether the preview accepts edits.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.surface
            .as_ref()
            .is_some_and(RichTextSurface::is_editable)
    }

    /// Returns whether a document was downloaded in this session.
    #[must_use]
    pub fn has_downloaded(&self) -> bool {
        self.has_downloaded
    }

    /// Returns metadata of every successful export, oldest first.
    #[must_use]
    pub fn history(&self) -> &[GeneratedDocumentMetadata] {
        &self.history
    }

    /// Selects a document type and enters config loading.
    pub fn select_document_type(
        &mut self,
        document_type_id: &str,
        job_id: Option<String>,
    ) -> AppResult<ConfigLoadRequest> {
        self.require_step(WorkflowStep::SelectType, "select a document type")?;
        let template = TemplateKind::resolve(document_type_id)?;

        self.reset_document();
        self.selection = Some(Selection {
            document_type_id: document_type_id.to_owned(),
            job_id: job_id.filter(|job_id| !job_id.trim().is_empty()),
            template,
        });
        self.logo_sizing = template.logo_sizing();
        self.step = WorkflowStep::LoadConfig;

        info!(
            operator = %self.operator.subject(),
            document_type_id,
            "document type selected"
        );
        self.begin_config_load()
    }

    /// Starts (or retries) fetching the selected config.
    pub fn begin_config_load(&mut self) -> AppResult<ConfigLoadRequest> {
        self.require_step(WorkflowStep::LoadConfig, "load a document config")?;
        let selection = self.selected()?;
        let request = ConfigLoadRequest {
            document_type_id: selection.document_type_id.clone(),
            job_id: selection.job_id.clone(),
            generation: self.load_generation + 1,
        };

        self.load_generation = request.generation;
        self.config_load_error = None;
        Ok(request)
    }

    /// Applies the outcome of a config fetch.
    ///
    /// Failures keep the workflow in `load-config` with the error recorded.
    pub fn finish_config_load(
        &mut self,
        request: &ConfigLoadRequest,
        result: AppResult<DocumentConfig>,
    ) -> AppResult<()> {
        self.require_step(WorkflowStep::LoadConfig, "finish loading a document config")?;
        if request.generation != self.load_generation {
            return Err(AppError::Conflict(
                "config load was superseded by a newer request".to_owned(),
            ));
        }

        match result {
            Ok(config) if config.id() != request.document_type_id => {
                let message = format!(
                    "config source returned '{}' for document type '{}'",
                    config.id(),
                    request.document_type_id
                );
                warn!(document_type_id = %request.document_type_id, %message, "document config rejected");
                self.config_load_error = Some(message);
            }
            Ok(config) => {
                self.form_data = config.initial_values().clone();
                self.errors.clear();
                self.config = Some(config);
                self.config_load_error = None;
                self.step = WorkflowStep::FormEntry;
                info!(document_type_id = %request.document_type_id, "document config loaded");
            }
            Err(load_error) => {
                warn!(
                    document_type_id = %request.document_type_id,
                    error = %load_error,
                    "document config load failed"
                );
                self.config_load_error = Some(load_error.to_string());
            }
        }

        Ok(())
    }

    /// Returns to type selection from any later step.
    pub fn abandon(&mut self) -> AppResult<()> {
        if self.step == WorkflowStep::SelectType {
            return Err(AppError::Conflict(
                "no document type selected to abandon".to_owned(),
            ));
        }

        self.reset_document();
        self.selection = None;
        self.step = WorkflowStep::SelectType;
        info!(operator = %self.operator.subject(), "document workflow abandoned");
        Ok(())
    }

    /// Stores a field value during form entry.
    ///
    /// A field that currently shows an error is re-validated immediately.
    pub fn update_field(&mut self, field_id: &str, value: FormValue) -> AppResult<()> {
        self.require_step(WorkflowStep::FormEntry, "update a field")?;
        let config = self.loaded_config()?;
        let field = config.field(field_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "field '{field_id}' is not part of document type '{}'",
                config.id()
            ))
        })?;
        if field.behavior() == FieldBehavior::Readonly {
            return Err(AppError::Validation(format!(
                "field '{field_id}' is read-only"
            )));
        }

        let revalidated = self
            .errors
            .iter()
            .any(|error| error.field_id() == field_id)
            .then(|| validate_field(field, value.as_text().as_ref()));

        self.form_data.set(field_id, value);
        if let Some(outcome) = revalidated {
            self.errors.retain(|error| error.field_id() != field_id);
            self.errors.extend(outcome);
        }

        Ok(())
    }

    /// Validates the form and, when clean, renders the preview.
    pub fn proceed_to_preview(&mut self) -> AppResult<PreviewGate> {
        self.require_step(WorkflowStep::FormEntry, "preview the document")?;
        let config = self.loaded_config()?;
        let errors = validate_form(config, &self.form_data);

        if !errors.is_empty() {
            let error_count = errors.len();
            self.errors = errors;
            info!(error_count, "preview blocked by validation errors");
            return Ok(PreviewGate::Blocked { error_count });
        }

        let rendered = self.selected()?.template.render(&self.form_data);
        let mut surface = RichTextSurface::new();
        surface.complete_initial_render(rendered.body)?;

        self.errors.clear();
        self.surface = Some(surface);
        self.file_stem = rendered.file_stem;
        self.logo_sizing = rendered.logo_sizing;
        self.step = WorkflowStep::Preview;
        Ok(PreviewGate::Advanced)
    }

    /// Moves one step back. Leaving preview discards the rendered document.
    pub fn back(&mut self) -> AppResult<WorkflowStep> {
        let previous = self.step.previous().ok_or_else(|| {
            AppError::Conflict(format!("cannot go back from step '{}'", self.step.as_str()))
        })?;

        match self.step {
            WorkflowStep::LoadConfig | WorkflowStep::FormEntry => {
                self.reset_document();
                self.selection = None;
            }
            WorkflowStep::Preview => {
                self.surface = None;
            }
            WorkflowStep::Generate | WorkflowStep::SelectType => {}
        }

        self.step = previous;
        Ok(previous)
    }

    /// Toggles Edit/Done on the preview.
    pub fn set_editing(&mut self, editing: bool) -> AppResult<()> {
        self.require_step(WorkflowStep::Preview, "toggle editing")?;
        self.surface_mut()?.set_editable(editing);
        Ok(())
    }

    /// Replaces the previewed document with the editor's latest tree.
    pub fn apply_edit(&mut self, document: DocumentAst) -> AppResult<&DocumentAst> {
        self.require_step(WorkflowStep::Preview, "edit the document")?;
        self.surface_mut()?.apply_edit(document)
    }

    /// Leaves preview for the download step.
    pub fn proceed_to_generate(&mut self) -> AppResult<()> {
        self.require_step(WorkflowStep::Preview, "generate the document")?;
        let surface = self.surface_mut()?;
        if !surface.is_ready() {
            return Err(AppError::Conflict(
                "document preview has not been rendered".to_owned(),
            ));
        }

        surface.set_editable(false);
        self.step = WorkflowStep::Generate;
        Ok(())
    }

    /// Handles a download click. Repeat downloads need explicit confirmation.
    pub fn request_download(&self, confirm_repeat: bool) -> AppResult<DownloadDecision> {
        self.require_step(WorkflowStep::Generate, "download the document")?;
        if self.has_downloaded && !confirm_repeat {
            return Ok(DownloadDecision::ConfirmRepeat);
        }

        let document = self
            .surface
            .as_ref()
            .ok_or_else(|| AppError::Conflict("no document to download".to_owned()))?
            .snapshot()?;

        Ok(DownloadDecision::Export(Box::new(ExportRequest {
            document,
            options: ExportOptions {
                file_name: self.file_stem.clone(),
                logo_url: self.logo_url.clone(),
                logo_sizing: self.logo_sizing,
            },
            status: if self.has_downloaded {
                GenerationStatus::Regenerated
            } else {
                GenerationStatus::Generated
            },
        })))
    }

    /// Records a successful export.
    pub fn record_export(
        &mut self,
        request: &ExportRequest,
        exported: &ExportedDocument,
    ) -> AppResult<&GeneratedDocumentMetadata> {
        self.require_step(WorkflowStep::Generate, "record a generated document")?;
        let document_type_id = self.selected()?.document_type_id.clone();
        let version = u32::try_from(self.history.len() + 1)
            .map_err(|_| AppError::Internal("generation history overflow".to_owned()))?;

        self.has_downloaded = true;
        self.history.push(GeneratedDocumentMetadata::new(
            document_type_id,
            exported.file_name.clone(),
            version,
            self.operator.display_name(),
            request.status,
        ));
        info!(
            operator = %self.operator.subject(),
            file_name = %exported.file_name,
            version,
            "generated document recorded"
        );

        self.history
            .last()
            .ok_or_else(|| AppError::Internal("generation history is empty".to_owned()))
    }

    fn require_step(&self, expected: WorkflowStep, action: &str) -> AppResult<()> {
        if self.step == expected {
            return Ok(());
        }

        Err(AppError::Conflict(format!(
            "cannot {action} at step '{}'",
            self.step.as_str()
        )))
    }

    fn selected(&self) -> AppResult<&Selection> {
        self.selection
            .as_ref()
            .ok_or_else(|| AppError::Conflict("no document type selected".to_owned()))
    }

    fn loaded_config(&self) -> AppResult<&DocumentConfig> {
        self.config
            .as_ref()
            .ok_or_else(|| AppError::Conflict("document config is not loaded".to_owned()))
    }

    fn surface_mut(&mut self) -> AppResult<&mut RichTextSurface> {
        self.surface
            .as_mut()
            .ok_or_else(|| AppError::Conflict("document preview has not been rendered".to_owned()))
    }

    fn reset_document(&mut self) {
        self.load_generation += 1;
        self.config = None;
        self.config_load_error = None;
        self.form_data.clear();
        self.errors.clear();
        self.surface = None;
        self.file_stem.clear();
        self.logo_sizing = LogoSizing::default();
    }
}
