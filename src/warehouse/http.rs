use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;

use crate::error::{AnnotateError, Result};
use crate::warehouse::statements::TableSchema;
use crate::warehouse::WarehouseClient;

/// Production client talking JSON to the analytics warehouse gateway.
pub struct HttpWarehouseClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWarehouseClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpWarehouseClient {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), suffix)
    }

    async fn exists(&self, url: &str) -> Result<bool> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AnnotateError::WarehouseError(e.to_string()))?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(AnnotateError::WarehouseError(format!(
                "Unexpected status {} from {}",
                status, url
            ))),
        }
    }

    async fn post_json(&self, url: &str, body: serde_json::Value) -> Result<()> {
        self.client
            .post(url)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AnnotateError::WarehouseError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl WarehouseClient for HttpWarehouseClient {
    async fn dataset_exists(&self, dataset: &str) -> Result<bool> {
        self.exists(&self.url(&format!("/v1/datasets/{}", dataset)))
            .await
    }

    async fn create_dataset(&self, dataset: &str) -> Result<()> {
        self.post_json(&self.url("/v1/datasets"), json!({ "dataset": dataset }))
            .await
    }

    async fn table_exists(&self, dataset: &str, table: &str) -> Result<bool> {
        self.exists(&self.url(&format!("/v1/datasets/{}/tables/{}", dataset, table)))
            .await
    }

    async fn create_table(&self, dataset: &str, table: &str, schema: &TableSchema) -> Result<()> {
        self.post_json(
            &self.url(&format!("/v1/datasets/{}/tables", dataset)),
            json!({ "table": table, "schema": schema }),
        )
        .await
    }

    async fn execute(&self, statement: &str) -> Result<()> {
        self.post_json(&self.url("/v1/query"), json!({ "statement": statement }))
            .await
    }
}
