use std::sync::Arc;

use docforge_core::{AppError, AppResult};
use docforge_domain::DocumentAst;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::document_ports::{DocumentSerializer, LogoFetcher, LogoImage, LogoSizing};

/// Caller-supplied export settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// File name without extension.
    pub file_name: String,
    /// Optional letterhead logo location.
    pub logo_url: Option<String>,
    /// Logo placement.
    pub logo_sizing: LogoSizing,
}

/// Packed document ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    /// File name including extension.
    pub file_name: String,
    /// MIME type.
    pub content_type: &'static str,
    /// File bytes.
    pub bytes: Vec<u8>,
}

/// Turns a document tree into a downloadable file.
#[derive(Clone)]
pub struct DocumentExportService {
    logo_fetcher: Arc<dyn LogoFetcher>,
    serializer: Arc<dyn DocumentSerializer>,
}

impl DocumentExportService {
    /// Creates an export service.
    #[must_use]
    pub fn new(logo_fetcher: Arc<dyn LogoFetcher>, serializer: Arc<dyn DocumentSerializer>) -> Self {
        Self {
            logo_fetcher,
            serializer,
        }
    }

    /// Exports a document. Logo problems degrade to a logo-less file.
    pub async fn export(
        &self,
        document: &DocumentAst,
        options: &ExportOptions,
    ) -> AppResult<ExportedDocument> {
        let logo = self.fetch_logo(options).await;

        let bytes = self
            .serializer
            .serialize(document, logo.as_ref())
            .map_err(|serialize_error| {
                error!(
                    error = %serialize_error,
                    file_name = %options.file_name,
                    "document serialization failed"
                );
                serialize_error
            })?;

        let file_name = format!("{}.{}", options.file_name, self.serializer.file_extension());
        info!(
            file_name = %file_name,
            size_bytes = bytes.len(),
            with_logo = logo.is_some(),
            "document exported"
        );

        Ok(ExportedDocument {
            file_name,
            content_type: self.serializer.content_type(),
            bytes,
        })
    }

    /// Exports a document unless the token is cancelled first.
    pub async fn export_cancellable(
        &self,
        document: &DocumentAst,
        options: &ExportOptions,
        cancellation: &CancellationToken,
    ) -> AppResult<ExportedDocument> {
        tokio::select! {
            biased;
            () = cancellation.cancelled() => {
                info!(file_name = %options.file_name, "document export cancelled");
                Err(AppError::Cancelled("document export was cancelled".to_owned()))
            }
            result = self.export(document, options) => result,
        }
    }

    async fn fetch_logo(&self, options: &ExportOptions) -> Option<LogoImage> {
        let logo_url = options.logo_url.as_deref()?;

        match self.logo_fetcher.fetch_logo(logo_url).await {
            Ok(bytes) if bytes.is_empty() => {
                warn!(logo_url, "logo fetch returned no bytes, exporting without logo");
                None
            }
            Ok(bytes) => Some(LogoImage {
                bytes,
                sizing: options.logo_sizing,
            }),
            Err(fetch_error) => {
                warn!(
                    logo_url,
                    error = %fetch_error,
                    "logo fetch failed, exporting without logo"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests;
