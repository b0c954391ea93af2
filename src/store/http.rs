use async_trait::async_trait;
use serde_json::json;

use crate::error::{AnnotateError, Result};
use crate::store::{DocumentWriter, FieldUpdate};

/// Production writer talking JSON to the document store gateway.
pub struct HttpDocumentWriter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentWriter {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpDocumentWriter {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DocumentWriter for HttpDocumentWriter {
    async fn update(&self, doc_path: &str, field_path: &str, value: FieldUpdate) -> Result<()> {
        let url = format!(
            "{}/v1/documents/{}",
            self.base_url.trim_end_matches('/'),
            doc_path
        );
        let body = match &value {
            FieldUpdate::Set(value) => json!({ "field": field_path, "value": value }),
            FieldUpdate::Delete => json!({ "field": field_path, "delete": true }),
        };

        self.client
            .patch(&url)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AnnotateError::StoreError(e.to_string()))?;
        Ok(())
    }
}
