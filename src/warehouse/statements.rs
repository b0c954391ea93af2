//! Statement and schema construction for the analytics warehouse. Rows are
//! built by textual substitution into fixed templates, one wide table per
//! task kind.

use serde::Serialize;

use crate::data_model::{AnnotationResult, TaskKind, TaskOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    String,
    Float,
    Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: &'static str,
    pub column_type: ColumnType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    pub columns: Vec<Column>,
}

fn column(name: &'static str, column_type: ColumnType) -> Column {
    Column { name, column_type }
}

/// Fixed schema of the table holding one task kind's rows. Every table
/// shares the `collection_path`/`doc_id`/`timestamp` columns used for
/// correlation and deletion.
pub fn table_schema(kind: TaskKind) -> TableSchema {
    let mut columns = vec![
        column("collection_path", ColumnType::String),
        column("doc_id", ColumnType::String),
    ];
    match kind {
        TaskKind::Sentiment => {
            columns.push(column("score", ColumnType::Float));
            columns.push(column("magnitude", ColumnType::Float));
        }
        TaskKind::Classification => {
            columns.push(column("category", ColumnType::String));
        }
        TaskKind::Entity => {
            columns.push(column("entity_type", ColumnType::String));
            columns.push(column("entity_name", ColumnType::String));
        }
    }
    columns.push(column("timestamp", ColumnType::Timestamp));
    TableSchema { columns }
}

pub fn table_name(prefix: &str, kind: TaskKind) -> String {
    format!("{}{}", prefix, kind.key())
}

/// Escapes a value for inclusion in a single-quoted SQL string literal by
/// doubling embedded quotes.
pub fn escape_string(raw: &str) -> String {
    raw.replace('\'', "''")
}

/// Builds one INSERT statement per warehouse row for a merged annotation
/// result: a single row for sentiment, one per classification category, one
/// per entity-type and entity-name pair. Empty outputs yield no rows.
pub fn insert_statements(
    dataset: &str,
    prefix: &str,
    result: &AnnotationResult,
    collection_path: &str,
    doc_id: &str,
    timestamp: &str,
) -> Vec<String> {
    let collection_path = escape_string(collection_path);
    let doc_id = escape_string(doc_id);
    let mut statements = Vec::new();

    for output in result.values() {
        match output {
            TaskOutput::Sentiment(score) => {
                statements.push(format!(
                    "INSERT INTO `{}.{}` (collection_path, doc_id, score, magnitude, timestamp) \
                     VALUES ('{}', '{}', {}, {}, '{}')",
                    dataset,
                    table_name(prefix, TaskKind::Sentiment),
                    collection_path,
                    doc_id,
                    score.score,
                    score.magnitude,
                    timestamp
                ));
            }
            TaskOutput::Classification(categories) => {
                for category in categories {
                    statements.push(format!(
                        "INSERT INTO `{}.{}` (collection_path, doc_id, category, timestamp) \
                         VALUES ('{}', '{}', '{}', '{}')",
                        dataset,
                        table_name(prefix, TaskKind::Classification),
                        collection_path,
                        doc_id,
                        escape_string(category),
                        timestamp
                    ));
                }
            }
            TaskOutput::Entities(entities) => {
                for (entity_type, names) in entities {
                    for name in names {
                        statements.push(format!(
                            "INSERT INTO `{}.{}` (collection_path, doc_id, entity_type, \
                             entity_name, timestamp) VALUES ('{}', '{}', '{}', '{}', '{}')",
                            dataset,
                            table_name(prefix, TaskKind::Entity),
                            collection_path,
                            doc_id,
                            escape_string(entity_type),
                            escape_string(name),
                            timestamp
                        ));
                    }
                }
            }
        }
    }

    statements
}

/// DELETE scoped to one document's rows in one task table.
pub fn delete_statement(
    dataset: &str,
    prefix: &str,
    kind: TaskKind,
    collection_path: &str,
    doc_id: &str,
) -> String {
    format!(
        "DELETE FROM `{}.{}` WHERE collection_path = '{}' AND doc_id = '{}'",
        dataset,
        table_name(prefix, kind),
        escape_string(collection_path),
        escape_string(doc_id)
    )
}
