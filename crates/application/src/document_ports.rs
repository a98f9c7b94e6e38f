use async_trait::async_trait;
use docforge_core::AppResult;
use docforge_domain::{DocumentAst, DocumentConfig, DocumentTypeSummary};

/// Port for the collaborator that owns document type definitions.
#[async_trait]
pub trait DocumentConfigSource: Send + Sync {
    /// Lists selectable document types in display order.
    async fn list_document_types(&self) -> AppResult<Vec<DocumentTypeSummary>>;

    /// Loads the field configuration of one document type.
    async fn load_config(
        &self,
        document_type_id: &str,
        job_id: Option<&str>,
    ) -> AppResult<DocumentConfig>;
}

/// Port for downloading the raster logo embedded in exported letters.
#[async_trait]
pub trait LogoFetcher: Send + Sync {
    /// Fetches raw image bytes from a URL.
    async fn fetch_logo(&self, logo_url: &str) -> AppResult<Vec<u8>>;
}

/// How the embedded logo is sized on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoSizing {
    /// Fixed bounding box in pixels.
    FixedBox {
        /// Width in pixels.
        width_px: u32,
        /// Height in pixels.
        height_px: u32,
    },
    /// Fixed height in points, width scaled from the image's aspect ratio.
    ProportionalHeight {
        /// Height in points.
        height_pt: u32,
    },
}

impl Default for LogoSizing {
    fn default() -> Self {
        Self::FixedBox {
            width_px: 120,
            height_px: 60,
        }
    }
}

/// Logo bytes ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoImage {
    /// Raw raster bytes.
    pub bytes: Vec<u8>,
    /// Placement size.
    pub sizing: LogoSizing,
}

/// Port for packing a document tree into a word-processor file.
pub trait DocumentSerializer: Send + Sync {
    /// File extension without the leading dot.
    fn file_extension(&self) -> &'static str;

    /// MIME type of the produced file.
    fn content_type(&self) -> &'static str;

    /// Serializes a document tree, optionally prefixed by a logo.
    fn serialize(&self, document: &DocumentAst, logo: Option<&LogoImage>) -> AppResult<Vec<u8>>;
}
