use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AnnotateError;
use crate::utils::common::{split_doc_path, value_at};

/// Immutable view of a document at one point in time. A snapshot with
/// `exists == false` still carries the document path (needed for deletes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub exists: bool,
    pub path: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl DocumentSnapshot {
    pub fn existing(path: impl Into<String>, fields: Map<String, Value>) -> Self {
        DocumentSnapshot {
            exists: true,
            path: path.into(),
            fields,
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        DocumentSnapshot {
            exists: false,
            path: path.into(),
            fields: Map::new(),
        }
    }

    /// Reads a value at a dot-delimited field path. A non-existent document
    /// has no fields by definition.
    pub fn get(&self, field_path: &str) -> Option<&Value> {
        if !self.exists {
            return None;
        }
        value_at(&self.fields, field_path)
    }

    pub fn collection_path(&self) -> &str {
        split_doc_path(&self.path).0
    }

    pub fn doc_id(&self) -> &str {
        split_doc_path(&self.path).1
    }
}

/// One document write delivered by the trigger mechanism: the snapshot pair
/// around the write. Consumed once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub before: DocumentSnapshot,
    pub after: DocumentSnapshot,
}

/// Kind of write that produced a change event. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Create,
    Delete,
    Update,
}

/// The NLP analysis tasks this service knows how to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Sentiment,
    Classification,
    Entity,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [
        TaskKind::Sentiment,
        TaskKind::Classification,
        TaskKind::Entity,
    ];

    /// String key used both in the merged output field and as the warehouse
    /// table suffix.
    pub fn key(&self) -> &'static str {
        match self {
            TaskKind::Sentiment => "sentiment",
            TaskKind::Classification => "classification",
            TaskKind::Entity => "entity",
        }
    }

    /// Case-insensitive parse of a configured task name. `None` means the
    /// name is not a recognized task; callers decide whether that is fatal.
    pub fn parse(raw: &str) -> Option<TaskKind> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sentiment" => Some(TaskKind::Sentiment),
            "classification" => Some(TaskKind::Classification),
            "entity" => Some(TaskKind::Entity),
            _ => None,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Sentiment analysis output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub score: f64,
    pub magnitude: f64,
}

/// Per-task output shape. Serialized untagged so the merged document field
/// reads as `{"sentiment": {...}, "classification": [...], "entity": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskOutput {
    Sentiment(SentimentScore),
    Classification(Vec<String>),
    Entities(BTreeMap<String, Vec<String>>),
}

/// How one dispatched task settled.
#[derive(Debug)]
pub enum TaskOutcome {
    Success { task: TaskKind, output: TaskOutput },
    Failure { task: TaskKind, error: AnnotateError },
}

/// A task that failed, reported alongside the merged result.
#[derive(Debug)]
pub struct TaskFailure {
    pub task: TaskKind,
    pub error: AnnotateError,
}

/// Merged mapping from task key to output, successes only. Written to the
/// configured output field even when empty.
pub type AnnotationResult = BTreeMap<String, TaskOutput>;
