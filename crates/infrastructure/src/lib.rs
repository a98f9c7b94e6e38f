//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod builtin_document_catalog;
mod docx_document_serializer;
mod http_document_config_source;
mod http_logo_fetcher;
mod in_memory_session_store;

pub use builtin_document_catalog::BuiltinDocumentCatalog;
pub use docx_document_serializer::{
    BODY_SIZE_HALF_POINTS, DocxDocumentSerializer, HEADING_BASE_HALF_POINTS,
    PARAGRAPH_LINE_SPACING, PARAGRAPH_SPACING_AFTER,
};
pub use http_document_config_source::HttpDocumentConfigSource;
pub use http_logo_fetcher::HttpLogoFetcher;
pub use in_memory_session_store::InMemorySessionStore;
