use std::sync::Arc;

use docforge_core::{AppError, AppResult, OperatorIdentity, SessionId};
use docforge_domain::{
    DocumentAst, DocumentTypeSummary, FormValue, GeneratedDocumentMetadata, ValidationError,
    WorkflowStep,
};
use tracing::info;

use crate::document_ports::DocumentConfigSource;
use crate::export_service::{DocumentExportService, ExportedDocument};
use crate::form_renderer::FormView;
use crate::html_preview::render_html;
use crate::session_ports::{WorkflowSession, WorkflowSessionStore};
use crate::workflow_controller::{
    ConfigLoadRequest, DocumentWorkflow, DownloadDecision, PreviewGate,
};

/// Read model of one session's workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Session identifier.
    pub session_id: SessionId,
    /// Current step.
    pub step: WorkflowStep,
    /// Selected document type.
    pub document_type_id: Option<String>,
    /// Job the form was pre-populated from.
    pub job_id: Option<String>,
    /// Last config-load failure.
    pub config_load_error: Option<String>,
    /// Published validation errors.
    pub errors: Vec<ValidationError>,
    /// Dynamic form, once a config is loaded.
    pub form: Option<FormView>,
    /// Whether the preview accepts edits.
    pub editing: bool,
    /// Whether a document was already downloaded.
    pub has_downloaded: bool,
    /// Number of generated documents.
    pub generated_count: usize,
}

impl SessionSnapshot {
    fn capture(session_id: SessionId, workflow: &DocumentWorkflow) -> Self {
        Self {
            session_id,
            step: workflow.step(),
            document_type_id: workflow.document_type_id().map(str::to_owned),
            job_id: workflow.job_id().map(str::to_owned),
            config_load_error: workflow.config_load_error().map(str::to_owned),
            errors: workflow.errors().to_vec(),
            form: workflow.form_view(),
            editing: workflow.is_editing(),
            has_downloaded: workflow.has_downloaded(),
            generated_count: workflow.history().len(),
        }
    }
}

/// Rendered document as shown on the preview surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPreview {
    /// Editable document tree.
    pub document: DocumentAst,
    /// Static HTML projection of the tree.
    pub html: String,
    /// Whether edits are accepted.
    pub editing: bool,
}

impl DocumentPreview {
    fn capture(workflow: &DocumentWorkflow) -> AppResult<Self> {
        let document = workflow
            .document()
            .cloned()
            .ok_or_else(|| AppError::Conflict("document has not been rendered yet".to_owned()))?;

        Ok(Self {
            html: render_html(&document),
            document,
            editing: workflow.is_editing(),
        })
    }
}

/// Result of a download click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// File produced and recorded.
    Ready {
        /// Packed file.
        document: ExportedDocument,
        /// History entry for the export.
        metadata: GeneratedDocumentMetadata,
    },
    /// A file was already downloaded; the caller must confirm.
    ConfirmRepeat,
}

/// Application service driving document generation sessions.
#[derive(Clone)]
pub struct GenerationSessionService {
    config_source: Arc<dyn DocumentConfigSource>,
    export_service: DocumentExportService,
    session_store: Arc<dyn WorkflowSessionStore>,
    logo_url: Option<String>,
}

impl GenerationSessionService {
    /// Creates a session service.
    #[must_use]
    pub fn new(
        config_source: Arc<dyn DocumentConfigSource>,
        export_service: DocumentExportService,
        session_store: Arc<dyn WorkflowSessionStore>,
    ) -> Self {
        Self {
            config_source,
            export_service,
            session_store,
            logo_url: None,
        }
    }

    /// Sets the letterhead logo embedded in exported files.
    #[must_use]
    pub fn with_logo_url(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }

    /// Lists selectable document types.
    pub async fn list_document_types(
        &self,
        actor: &OperatorIdentity,
    ) -> AppResult<Vec<DocumentTypeSummary>> {
        let document_types = self.config_source.list_document_types().await?;
        info!(
            operator = %actor.subject(),
            count = document_types.len(),
            "document types listed"
        );
        Ok(document_types)
    }

    /// Opens a new session for the operator.
    pub async fn create_session(&self, actor: &OperatorIdentity) -> AppResult<SessionSnapshot> {
        let session = Arc::new(WorkflowSession::new(actor.clone(), self.logo_url.clone()));
        let snapshot = {
            let workflow = session.workflow().lock().await;
            SessionSnapshot::capture(session.id(), &workflow)
        };

        self.session_store.insert(session.clone()).await?;
        info!(operator = %actor.subject(), session_id = %session.id(), "session created");
        Ok(snapshot)
    }

    /// Returns the current state of a session.
    pub async fn session(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
    ) -> AppResult<SessionSnapshot> {
        let session = self.owned_session(actor, session_id).await?;
        let workflow = session.workflow().lock().await;
        Ok(SessionSnapshot::capture(session_id, &workflow))
    }

    /// Ends a session, cancelling any in-flight export.
    pub async fn close_session(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
    ) -> AppResult<()> {
        let session = self.owned_session(actor, session_id).await?;
        session.cancel_export().await;
        self.session_store.remove(session_id).await
    }

    /// Selects a document type and loads its config.
    pub async fn select_document_type(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
        document_type_id: &str,
        job_id: Option<String>,
    ) -> AppResult<SessionSnapshot> {
        let session = self.owned_session(actor, session_id).await?;
        let request = session
            .workflow()
            .lock()
            .await
            .select_document_type(document_type_id, job_id)?;

        self.load_config(&session, request).await
    }

    /// Retries a failed config load.
    pub async fn retry_config_load(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
    ) -> AppResult<SessionSnapshot> {
        let session = self.owned_session(actor, session_id).await?;
        let request = session.workflow().lock().await.begin_config_load()?;
        self.load_config(&session, request).await
    }

    /// Returns to type selection, discarding the current document.
    pub async fn abandon(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
    ) -> AppResult<SessionSnapshot> {
        let session = self.owned_session(actor, session_id).await?;
        session.cancel_export().await;

        let mut workflow = session.workflow().lock().await;
        workflow.abandon()?;
        Ok(SessionSnapshot::capture(session_id, &workflow))
    }

    /// Stores a field value.
    pub async fn update_field(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
        field_id: &str,
        value: FormValue,
    ) -> AppResult<SessionSnapshot> {
        let session = self.owned_session(actor, session_id).await?;
        let mut workflow = session.workflow().lock().await;
        workflow.update_field(field_id, value)?;
        Ok(SessionSnapshot::capture(session_id, &workflow))
    }

    /// Validates the form and renders the preview when valid.
    pub async fn proceed_to_preview(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
    ) -> AppResult<(PreviewGate, SessionSnapshot)> {
        let session = self.owned_session(actor, session_id).await?;
        let mut workflow = session.workflow().lock().await;
        let gate = workflow.proceed_to_preview()?;
        Ok((gate, SessionSnapshot::capture(session_id, &workflow)))
    }

    /// Moves one step back. Leaving the download step cancels any export.
    pub async fn back(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
    ) -> AppResult<SessionSnapshot> {
        let session = self.owned_session(actor, session_id).await?;
        let mut workflow = session.workflow().lock().await;
        if workflow.step() == WorkflowStep::Generate && session.cancel_export().await {
            info!(session_id = %session_id, "in-flight export cancelled by navigation");
        }

        workflow.back()?;
        Ok(SessionSnapshot::capture(session_id, &workflow))
    }

    /// Returns the previewed document.
    pub async fn document(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
    ) -> AppResult<DocumentPreview> {
        let session = self.owned_session(actor, session_id).await?;
        let workflow = session.workflow().lock().await;
        DocumentPreview::capture(&workflow)
    }

    /// Toggles Edit/Done on the preview.
    pub async fn set_editing(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
        editing: bool,
    ) -> AppResult<DocumentPreview> {
        let session = self.owned_session(actor, session_id).await?;
        let mut workflow = session.workflow().lock().await;
        workflow.set_editing(editing)?;
        DocumentPreview::capture(&workflow)
    }

    /// Applies a rich-text edit.
    pub async fn apply_edit(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
        document: DocumentAst,
    ) -> AppResult<DocumentPreview> {
        let session = self.owned_session(actor, session_id).await?;
        let mut workflow = session.workflow().lock().await;
        workflow.apply_edit(document)?;
        DocumentPreview::capture(&workflow)
    }

    /// Leaves preview for the download step.
    pub async fn proceed_to_generate(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
    ) -> AppResult<SessionSnapshot> {
        let session = self.owned_session(actor, session_id).await?;
        let mut workflow = session.workflow().lock().await;
        workflow.proceed_to_generate()?;
        Ok(SessionSnapshot::capture(session_id, &workflow))
    }

    /// Exports the document. Repeat downloads, including a click while an
    /// export is still running, need `confirm_repeat`.
    pub async fn download(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
        confirm_repeat: bool,
    ) -> AppResult<DownloadOutcome> {
        let session = self.owned_session(actor, session_id).await?;
        let (request, ticket) = {
            let workflow = session.workflow().lock().await;
            // A click while an export is still running counts as a repeat.
            if !confirm_repeat && session.is_exporting().await {
                return Ok(DownloadOutcome::ConfirmRepeat);
            }

            let request = match workflow.request_download(confirm_repeat)? {
                DownloadDecision::ConfirmRepeat => return Ok(DownloadOutcome::ConfirmRepeat),
                DownloadDecision::Export(request) => request,
            };
            (request, session.start_export().await)
        };

        let result = self
            .export_service
            .export_cancellable(&request.document, &request.options, ticket.token())
            .await;
        session.finish_export(&ticket).await;
        let exported = result?;

        let metadata = session
            .workflow()
            .lock()
            .await
            .record_export(&request, &exported)?
            .clone();

        info!(
            operator = %actor.subject(),
            session_id = %session_id,
            version = metadata.version(),
            "document downloaded"
        );
        Ok(DownloadOutcome::Ready {
            document: exported,
            metadata,
        })
    }

    /// Lists documents generated in the session.
    pub async fn history(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
    ) -> AppResult<Vec<GeneratedDocumentMetadata>> {
        let session = self.owned_session(actor, session_id).await?;
        let workflow = session.workflow().lock().await;
        Ok(workflow.history().to_vec())
    }

    async fn load_config(
        &self,
        session: &WorkflowSession,
        request: ConfigLoadRequest,
    ) -> AppResult<SessionSnapshot> {
        let result = self
            .config_source
            .load_config(&request.document_type_id, request.job_id.as_deref())
            .await;

        let mut workflow = session.workflow().lock().await;
        workflow.finish_config_load(&request, result)?;
        Ok(SessionSnapshot::capture(session.id(), &workflow))
    }

    async fn owned_session(
        &self,
        actor: &OperatorIdentity,
        session_id: SessionId,
    ) -> AppResult<Arc<WorkflowSession>> {
        self.session_store
            .find(session_id)
            .await?
            .filter(|session| session.is_owned_by(actor))
            .ok_or_else(|| AppError::NotFound(format!("session '{session_id}' does not exist")))
    }
}
