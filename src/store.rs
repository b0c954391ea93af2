// src/store.rs

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub mod http;

pub use http::HttpDocumentWriter;

/// Value applied to the output field: the merged annotation mapping or the
/// delete-field sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Set(Value),
    Delete,
}

/// Document store boundary. The handler invokes `update` at most once per
/// triggered invocation, after dispatch and aggregation complete, and never
/// for skipped events.
#[async_trait]
pub trait DocumentWriter: Send + Sync {
    async fn update(&self, doc_path: &str, field_path: &str, value: FieldUpdate) -> Result<()>;
}
