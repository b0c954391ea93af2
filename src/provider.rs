// src/provider.rs

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::data_model::SentimentScore;
use crate::error::Result;

pub mod http;

pub use http::HttpNlpProvider;

/// External natural-language analysis capability. One method per task kind;
/// each either returns the task's structured output or fails independently.
#[async_trait]
pub trait NlpProvider: Send + Sync {
    async fn analyze_sentiment(&self, text: &str) -> Result<SentimentScore>;

    /// Ordered category paths; possibly empty for short or unclassifiable
    /// text.
    async fn classify_text(&self, text: &str) -> Result<Vec<String>>;

    /// Mapping from entity type to the entity names found, possibly empty.
    async fn extract_entities(&self, text: &str) -> Result<BTreeMap<String, Vec<String>>>;
}
