//! Application services and ports.

#![forbid(unsafe_code)]

mod document_ports;
mod export_service;
mod form_renderer;
mod html_preview;
mod rich_text;
mod session_ports;
mod session_service;
mod template_renderer;
mod workflow_controller;

pub use document_ports::{
    DocumentConfigSource, DocumentSerializer, LogoFetcher, LogoImage, LogoSizing,
};
pub use export_service::{DocumentExportService, ExportOptions, ExportedDocument};
pub use form_renderer::{
    FieldControl, FieldView, FormTabView, FormView, InputHint, REQUIRED_MARKER, render_form,
};
pub use html_preview::render_html;
pub use rich_text::RichTextSurface;
pub use session_ports::{ExportTicket, WorkflowSession, WorkflowSessionStore};
pub use session_service::{
    DocumentPreview, DownloadOutcome, GenerationSessionService, SessionSnapshot,
};
pub use template_renderer::{RenderedTemplate, TemplateKind};
pub use workflow_controller::{
    ConfigLoadRequest, DocumentWorkflow, DownloadDecision, ExportRequest, PreviewGate,
};
