use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::data_model::SentimentScore;
use crate::error::{AnnotateError, Result};
use crate::provider::NlpProvider;

/// Production provider talking JSON to an NLP analysis service.
pub struct HttpNlpProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    task: &'a str,
    text: &'a str,
}

impl HttpNlpProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpNlpProvider {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn post_analyze<T: DeserializeOwned>(&self, task: &str, text: &str) -> Result<T> {
        let url = format!("{}/v1/analyze", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest { task, text })
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AnnotateError::ProviderError {
                task: task.to_string(),
                message: e.to_string(),
            })?;

        response
            .json::<T>()
            .await
            .map_err(|e| AnnotateError::ProviderError {
                task: task.to_string(),
                message: format!("Invalid response payload: {}", e),
            })
    }
}

#[async_trait]
impl NlpProvider for HttpNlpProvider {
    async fn analyze_sentiment(&self, text: &str) -> Result<SentimentScore> {
        self.post_analyze("sentiment", text).await
    }

    async fn classify_text(&self, text: &str) -> Result<Vec<String>> {
        self.post_analyze("classification", text).await
    }

    async fn extract_entities(&self, text: &str) -> Result<BTreeMap<String, Vec<String>>> {
        self.post_analyze("entity", text).await
    }
}
