use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome recorded for a successful export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    /// First export of the session.
    Generated,
    /// Export confirmed through the "download again?" prompt.
    Regenerated,
}

/// In-memory record of one generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocumentMetadata {
    id: Uuid,
    document_type_id: String,
    file_name: String,
    version: u32,
    generated_by: String,
    generated_at: DateTime<Utc>,
    status: GenerationStatus,
}

impl GeneratedDocumentMetadata {
    /// Creates a metadata record stamped with the current time.
    #[must_use]
    pub fn new(
        document_type_id: impl Into<String>,
        file_name: impl Into<String>,
        version: u32,
        generated_by: impl Into<String>,
        status: GenerationStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_type_id: document_type_id.into(),
            file_name: file_name.into(),
            version,
            generated_by: generated_by.into(),
            generated_at: Utc::now(),
            status,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the generated document type.
    #[must_use]
    pub fn document_type_id(&self) -> &str {
        self.document_type_id.as_str()
    }

    /// Returns the file name including extension.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Returns the one-based version within the session.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the operator display name.
    #[must_use]
    pub fn generated_by(&self) -> &str {
        self.generated_by.as_str()
    }

    /// Returns the generation timestamp.
    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Returns the status.
    #[must_use]
    pub fn status(&self) -> GenerationStatus {
        self.status
    }
}
