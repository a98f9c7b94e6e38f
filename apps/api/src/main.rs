//! Docforge API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use docforge_application::{DocumentConfigSource, DocumentExportService, GenerationSessionService};
use docforge_core::AppError;
use docforge_infrastructure::{
    BuiltinDocumentCatalog, DocxDocumentSerializer, HttpDocumentConfigSource, HttpLogoFetcher,
    InMemorySessionStore,
};
use tracing::info;

use crate::api_config::{ApiConfig, DocumentConfigSourceConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let config_source: Arc<dyn DocumentConfigSource> = match &config.document_config_source {
        DocumentConfigSourceConfig::Builtin => {
            info!("using built-in document catalog");
            Arc::new(BuiltinDocumentCatalog::new()?)
        }
        DocumentConfigSourceConfig::Http { base_url } => {
            info!(%base_url, "using remote document config service");
            Arc::new(HttpDocumentConfigSource::new(
                http_client.clone(),
                base_url.clone(),
            ))
        }
    };

    let export_service = DocumentExportService::new(
        Arc::new(HttpLogoFetcher::new(http_client, config.logo_max_bytes)),
        Arc::new(DocxDocumentSerializer::new()),
    );

    let session_store = Arc::new(InMemorySessionStore::with_idle_ttl(config.session_idle_ttl));
    tokio::spawn(
        session_store
            .clone()
            .run_eviction(config.session_sweep_period()),
    );
    info!(
        idle_ttl_seconds = config.session_idle_ttl.as_secs(),
        "idle session eviction enabled"
    );

    let mut session_service =
        GenerationSessionService::new(config_source, export_service, session_store);
    if let Some(logo_url) = &config.logo_url {
        session_service = session_service.with_logo_url(logo_url.clone());
    }

    let app_state = AppState {
        session_service,
        frontend_url: config.frontend_url.clone(),
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "docforge-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
