use async_trait::async_trait;
use docforge_application::DocumentConfigSource;
use docforge_core::{AppError, AppResult};
use docforge_domain::{
    DocumentConfig, DocumentTypeSummary, FieldSchema, FormDataMap, ValidationRule,
};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// Config source backed by the remote document configuration service.
#[derive(Debug, Clone)]
pub struct HttpDocumentConfigSource {
    http_client: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentConfigPayload {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    fields: Vec<FieldSchema>,
    #[serde(default, alias = "initialValues")]
    values: FormDataMap,
}

impl DocumentConfigPayload {
    fn into_config(self, document_type_id: &str) -> AppResult<DocumentConfig> {
        let id = self.id.unwrap_or_else(|| document_type_id.to_owned());
        let name = self.name.unwrap_or_else(|| id.clone());
        let icon = self.icon.unwrap_or_default();

        for field in &self.fields {
            for rule in field.validation_rules() {
                if let ValidationRule::Regex { pattern, .. } = rule
                    && !pattern.is_valid()
                {
                    warn!(
                        document_type_id = %id,
                        field_id = field.id(),
                        pattern = pattern.as_str(),
                        "regex rule does not compile and will reject every value"
                    );
                }
            }
        }

        Ok(DocumentConfig::new(id, name, icon, self.fields)?.with_initial_values(self.values))
    }
}

impl HttpDocumentConfigSource {
    /// Creates a config source rooted at the service base URL.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    fn endpoint(&self, segments: &[&str], job_id: Option<&str>) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!(
                    "document config URL '{}' cannot be a base",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        if let Some(job_id) = job_id {
            url.query_pairs_mut().append_pair("jobId", job_id);
        }

        Ok(url)
    }

    async fn get_json<T>(&self, url: Url, subject: &str) -> AppResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        debug!(%url, "fetching {subject}");
        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|error| {
                AppError::Unavailable(format!("{subject} request to '{url}' failed: {error}"))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("{subject} not found at '{url}'")));
        }
        if !status.is_success() {
            return Err(AppError::Unavailable(format!(
                "{subject} request to '{url}' returned status {status}"
            )));
        }

        response.json::<T>().await.map_err(|error| {
            AppError::Unavailable(format!("{subject} response from '{url}' is invalid: {error}"))
        })
    }
}

#[async_trait]
impl DocumentConfigSource for HttpDocumentConfigSource {
    async fn list_document_types(&self) -> AppResult<Vec<DocumentTypeSummary>> {
        let url = self.endpoint(&["document-types"], None)?;
        self.get_json(url, "document type list").await
    }

    async fn load_config(
        &self,
        document_type_id: &str,
        job_id: Option<&str>,
    ) -> AppResult<DocumentConfig> {
        let url = self.endpoint(&["document-configs", document_type_id], job_id)?;
        let payload: DocumentConfigPayload = self.get_json(url, "document config").await?;
        payload.into_config(document_type_id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use url::Url;

    use super::{DocumentConfigPayload, HttpDocumentConfigSource};

    fn source(base: &str) -> HttpDocumentConfigSource {
        HttpDocumentConfigSource::new(
            reqwest::Client::new(),
            Url::parse(base).unwrap_or_else(|_| unreachable!()),
        )
    }

    #[test]
    fn endpoint_escapes_segments_and_appends_job() {
        let url = source("https://configs.test/api/")
            .endpoint(&["document-configs", "price increase"], Some("job 7"))
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(
            url.as_str(),
            "https://configs.test/api/document-configs/price%20increase?jobId=job+7"
        );
    }

    #[test]
    fn payload_defaults_missing_identity_and_ignores_unknown_keys() {
        let payload: DocumentConfigPayload = serde_json::from_value(json!({
            "fields": [
                { "id": "contractNumber", "label": "Contract Number", "type": "text",
                  "behavior": "readonly", "tooltip": "ignored" },
                { "id": "proposedPrice", "label": "Proposed Price", "type": "currency",
                  "validationRules": [{ "kind": "range", "min": 0, "message": "Too low" }] }
            ],
            "values": { "contractNumber": "GS-35F-0119Y", "unknownField": "dropped" },
            "layout": "wide"
        }))
        .unwrap_or_else(|_| unreachable!());

        let config = payload
            .into_config("addition")
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.id(), "addition");
        assert_eq!(config.name(), "addition");
        assert_eq!(config.fields().len(), 2);
        assert_eq!(config.initial_values().len(), 1);
        assert_eq!(config.initial_values().text("contractNumber"), "GS-35F-0119Y");
    }
}
