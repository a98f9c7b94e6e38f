use std::io::{Cursor, Write};

use docforge_application::{DocumentSerializer, LogoImage};
use docforge_core::{AppError, AppResult};
use docforge_domain::DocumentAst;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

mod body;
mod logo;
mod parts;

use body::BodyWriter;
use logo::{ImageFormat, LogoPlacement};

/// Body text size in half-points.
pub const BODY_SIZE_HALF_POINTS: u32 = 24;

/// Reference size headings are derived from: `BASE - 2 * level` half-points.
pub const HEADING_BASE_HALF_POINTS: u32 = 32;

/// Space after every paragraph, in twentieths of a point.
pub const PARAGRAPH_SPACING_AFTER: u32 = 240;

/// Line height of every paragraph, in 240ths of a line.
pub const PARAGRAPH_LINE_SPACING: u32 = 360;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Serializer producing Office Open XML word-processing files.
///
/// Output is byte-identical for identical input: parts are written in a
/// fixed order with a fixed timestamp, and drawing ids are constant.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxDocumentSerializer;

impl DocxDocumentSerializer {
    /// Creates a serializer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DocumentSerializer for DocxDocumentSerializer {
    fn file_extension(&self) -> &'static str {
        "docx"
    }

    fn content_type(&self) -> &'static str {
        DOCX_CONTENT_TYPE
    }

    fn serialize(&self, document: &DocumentAst, logo: Option<&LogoImage>) -> AppResult<Vec<u8>> {
        let placement = logo.map(LogoPlacement::measure);

        let mut body = BodyWriter::new();
        if let Some(placement) = &placement {
            body.logo_paragraph(placement);
        }
        body.blocks(document.content());

        let image_format = placement.as_ref().map(|placement| placement.format);
        let mut package = Package::new();
        package.add_text("[Content_Types].xml", &parts::content_types(image_format))?;
        package.add_text("_rels/.rels", parts::PACKAGE_RELATIONSHIPS)?;
        package.add_text("word/document.xml", &parts::document(&body.finish()))?;
        package.add_text(
            "word/_rels/document.xml.rels",
            &parts::document_relationships(image_format),
        )?;
        package.add_text("word/styles.xml", &parts::styles())?;
        package.add_text("word/numbering.xml", parts::NUMBERING)?;
        if let Some(placement) = placement {
            package.add_media(&media_path(placement.format), placement.bytes)?;
        }

        package.finish()
    }
}

fn media_path(format: ImageFormat) -> String {
    format!("word/media/logo.{}", format.extension())
}

struct Package {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl Package {
    fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn options(method: CompressionMethod) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(DateTime::default())
    }

    fn add_text(&mut self, name: &str, content: &str) -> AppResult<()> {
        self.add(name, content.as_bytes(), CompressionMethod::Deflated)
    }

    fn add_media(&mut self, name: &str, bytes: &[u8]) -> AppResult<()> {
        self.add(name, bytes, CompressionMethod::Stored)
    }

    fn add(&mut self, name: &str, bytes: &[u8], method: CompressionMethod) -> AppResult<()> {
        self.writer
            .start_file(name, Self::options(method))
            .map_err(|error| AppError::Internal(format!("failed to start part '{name}': {error}")))?;
        self.writer
            .write_all(bytes)
            .map_err(|error| AppError::Internal(format!("failed to write part '{name}': {error}")))
    }

    fn finish(self) -> AppResult<Vec<u8>> {
        self.writer
            .finish()
            .map(Cursor::into_inner)
            .map_err(|error| AppError::Internal(format!("failed to finish docx package: {error}")))
    }
}

/// Escapes text for XML content and attribute values.
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
