// Warehouse mirror

pub mod http;
pub mod statements;

pub use http::HttpWarehouseClient;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::MirrorConfig;
use crate::data_model::{AnnotationResult, TaskKind};
use crate::error::Result;
use crate::utils::prometheus_metrics::{
    WAREHOUSE_BOOTSTRAP_FAILURES_TOTAL, WAREHOUSE_STATEMENTS_TOTAL,
    WAREHOUSE_STATEMENT_ERRORS_TOTAL,
};
use statements::{delete_statement, insert_statements, table_name, table_schema, TableSchema};

/// Analytics warehouse boundary: dataset/table administration plus raw
/// statement execution.
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    async fn dataset_exists(&self, dataset: &str) -> Result<bool>;
    async fn create_dataset(&self, dataset: &str) -> Result<()>;
    async fn table_exists(&self, dataset: &str, table: &str) -> Result<bool>;
    async fn create_table(&self, dataset: &str, table: &str, schema: &TableSchema) -> Result<()>;
    async fn execute(&self, statement: &str) -> Result<()>;
}

/// Bootstrap lifecycle of the mirror. `Initializing` is only observable
/// while the state lock is held by a bootstrapping call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorState {
    Uninitialized,
    Initializing,
    Ready,
}

/// Best-effort row-level mirror of successful annotation results.
///
/// Constructed once per process and shared across invocations; the first
/// write or delete bootstraps the dataset and all task tables. A bootstrap
/// failure is surfaced to the caller and resets the state so the next call
/// retries from scratch. Row statements fan out concurrently and individual
/// failures are logged and swallowed.
pub struct WarehouseMirror {
    client: std::sync::Arc<dyn WarehouseClient>,
    config: MirrorConfig,
    state: Mutex<MirrorState>,
}

impl WarehouseMirror {
    pub fn new(client: std::sync::Arc<dyn WarehouseClient>, config: MirrorConfig) -> Self {
        WarehouseMirror {
            client,
            config,
            state: Mutex::new(MirrorState::Uninitialized),
        }
    }

    pub async fn state(&self) -> MirrorState {
        *self.state.lock().await
    }

    /// Inserts one row set for a merged annotation result. All rows share a
    /// single timestamp so they can be correlated later. Only bootstrap
    /// failures propagate; statement failures are best-effort.
    pub async fn write_nlp_data(
        &self,
        result: &AnnotationResult,
        collection_path: &str,
        doc_id: &str,
    ) -> Result<()> {
        self.ensure_ready().await?;

        let timestamp = Utc::now().to_rfc3339();
        let statements = insert_statements(
            &self.config.dataset,
            &self.config.table_prefix,
            result,
            collection_path,
            doc_id,
            &timestamp,
        );
        self.execute_best_effort(statements).await;
        Ok(())
    }

    /// Purges every mirrored row for one document across the supported task
    /// tables.
    pub async fn delete_nlp_data(&self, collection_path: &str, doc_id: &str) -> Result<()> {
        self.ensure_ready().await?;

        let statements: Vec<String> = self
            .supported_tasks()
            .into_iter()
            .map(|kind| {
                delete_statement(
                    &self.config.dataset,
                    &self.config.table_prefix,
                    kind,
                    collection_path,
                    doc_id,
                )
            })
            .collect();
        self.execute_best_effort(statements).await;
        Ok(())
    }

    /// Task set the mirror maintains. An empty configured set means every
    /// supported task; unknown names are logged and skipped.
    fn supported_tasks(&self) -> Vec<TaskKind> {
        if self.config.tasks.is_empty() {
            return TaskKind::ALL.to_vec();
        }
        let mut kinds = Vec::new();
        for raw in &self.config.tasks {
            match TaskKind::parse(raw) {
                Some(kind) => {
                    if !kinds.contains(&kind) {
                        kinds.push(kind);
                    }
                }
                None => warn!(task = %raw, "Unrecognized task name in mirror configuration. Skipping."),
            }
        }
        kinds
    }

    /// Idempotent schema bootstrap guarded by the state lock, so racing
    /// first-calls from concurrent invocations run it once.
    async fn ensure_ready(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if *state == MirrorState::Ready {
            return Ok(());
        }

        *state = MirrorState::Initializing;
        match self.bootstrap().await {
            Ok(()) => {
                *state = MirrorState::Ready;
                Ok(())
            }
            Err(e) => {
                WAREHOUSE_BOOTSTRAP_FAILURES_TOTAL.inc();
                *state = MirrorState::Uninitialized;
                Err(e)
            }
        }
    }

    async fn bootstrap(&self) -> Result<()> {
        let dataset = &self.config.dataset;
        if !self.client.dataset_exists(dataset).await? {
            info!(%dataset, "Creating warehouse dataset");
            self.client.create_dataset(dataset).await?;
        }

        // One table per task kind, regardless of which tasks are enabled.
        for kind in TaskKind::ALL {
            let table = table_name(&self.config.table_prefix, kind);
            if !self.client.table_exists(dataset, &table).await? {
                info!(%dataset, %table, "Creating warehouse table");
                self.client
                    .create_table(dataset, &table, &table_schema(kind))
                    .await?;
            }
        }
        Ok(())
    }

    async fn execute_best_effort(&self, statements: Vec<String>) {
        let executions = statements.iter().map(|statement| async move {
            WAREHOUSE_STATEMENTS_TOTAL.inc();
            if let Err(e) = self.client.execute(statement).await {
                WAREHOUSE_STATEMENT_ERRORS_TOTAL.inc();
                error!(statement = %statement, error = %e, "Warehouse statement failed");
            }
        });
        join_all(executions).await;
    }
}
