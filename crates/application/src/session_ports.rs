use std::sync::Arc;

use async_trait::async_trait;
use docforge_core::{AppResult, OperatorIdentity, SessionId};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::workflow_controller::DocumentWorkflow;

/// One operator's document generation session.
#[derive(Debug)]
pub struct WorkflowSession {
    id: SessionId,
    owner_subject: String,
    workflow: Mutex<DocumentWorkflow>,
    active_export: Mutex<ExportSlot>,
}

impl WorkflowSession {
    /// Creates a session around a fresh workflow.
    #[must_use]
    pub fn new(operator: OperatorIdentity, logo_url: Option<String>) -> Self {
        Self {
            id: SessionId::new(),
            owner_subject: operator.subject().to_owned(),
            workflow: Mutex::new(DocumentWorkflow::new(operator, logo_url)),
            active_export: Mutex::new(ExportSlot::default()),
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns whether the operator owns this session.
    #[must_use]
    pub fn is_owned_by(&self, operator: &OperatorIdentity) -> bool {
        self.owner_subject == operator.subject()
    }

    /// Returns the workflow lock.
    #[must_use]
    pub fn workflow(&self) -> &Mutex<DocumentWorkflow> {
        &self.workflow
    }

    /// Returns whether an export is in flight.
    pub async fn is_exporting(&self) -> bool {
        self.active_export.lock().await.active.is_some()
    }

    /// Registers a new in-flight export, cancelling any previous one.
    pub async fn start_export(&self) -> ExportTicket {
        let mut slot = self.active_export.lock().await;
        slot.issued += 1;
        let ticket = ExportTicket {
            number: slot.issued,
            token: CancellationToken::new(),
        };
        if let Some(previous) = slot.active.replace(ticket.clone()) {
            previous.token.cancel();
        }
        ticket
    }

    /// Clears the in-flight export if it is still the given one.
    pub async fn finish_export(&self, ticket: &ExportTicket) {
        let mut slot = self.active_export.lock().await;
        if slot
            .active
            .as_ref()
            .is_some_and(|active| active.number == ticket.number)
        {
            slot.active = None;
        }
    }

    /// Cancels the in-flight export, if any.
    pub async fn cancel_export(&self) -> bool {
        match self.active_export.lock().await.active.take() {
            Some(ticket) => {
                ticket.token.cancel();
                true
            }
            None => false,
        }
    }
}

/// Handle of one in-flight export.
#[derive(Debug, Clone)]
pub struct ExportTicket {
    number: u64,
    token: CancellationToken,
}

impl ExportTicket {
    /// Returns the cancellation token observed by the export.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[derive(Debug, Default)]
struct ExportSlot {
    issued: u64,
    active: Option<ExportTicket>,
}

/// Storage port for live sessions.
#[async_trait]
pub trait WorkflowSessionStore: Send + Sync {
    /// Stores a new session.
    async fn insert(&self, session: Arc<WorkflowSession>) -> AppResult<()>;

    /// Finds a session by identifier.
    async fn find(&self, session_id: SessionId) -> AppResult<Option<Arc<WorkflowSession>>>;

    /// Removes a session.
    async fn remove(&self, session_id: SessionId) -> AppResult<()>;
}
