use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::HandlerConfig;
use crate::data_model::{TaskKind, TaskOutcome, TaskOutput};
use crate::provider::NlpProvider;
use crate::utils::prometheus_metrics::{TASKS_DISPATCHED_TOTAL, UNKNOWN_TASKS_TOTAL};

/// Fans the configured analysis tasks out against the NLP provider and
/// collects one settled outcome per recognized task.
pub struct TaskDispatcher {
    provider: Arc<dyn NlpProvider>,
    entity_types: HashSet<String>,
    save_common_entities: bool,
}

impl TaskDispatcher {
    pub fn new(provider: Arc<dyn NlpProvider>, config: &HandlerConfig) -> Self {
        TaskDispatcher {
            provider,
            entity_types: config.entity_types.iter().cloned().collect(),
            save_common_entities: config.save_common_entities,
        }
    }

    /// Dispatches every recognized task in `enabled_tasks` concurrently.
    ///
    /// Unknown task names are logged and excluded (no outcome, no failure);
    /// duplicates collapse to a single dispatch. A task's fault is captured
    /// in its own outcome and never aborts sibling tasks.
    pub async fn dispatch(&self, text: &str, enabled_tasks: &[String]) -> Vec<TaskOutcome> {
        let mut kinds: Vec<TaskKind> = Vec::new();
        let mut seen: HashSet<TaskKind> = HashSet::new();
        for raw in enabled_tasks {
            match TaskKind::parse(raw) {
                Some(kind) => {
                    if seen.insert(kind) {
                        kinds.push(kind);
                    }
                }
                None => {
                    UNKNOWN_TASKS_TOTAL.inc();
                    warn!(task = %raw, "Unrecognized task name in configuration. Skipping.");
                }
            }
        }

        debug!(num_tasks = kinds.len(), "Dispatching analysis tasks");
        join_all(kinds.into_iter().map(|kind| self.run_task(kind, text))).await
    }

    async fn run_task(&self, kind: TaskKind, text: &str) -> TaskOutcome {
        TASKS_DISPATCHED_TOTAL.inc();
        let result = match kind {
            TaskKind::Sentiment => self
                .provider
                .analyze_sentiment(text)
                .await
                .map(TaskOutput::Sentiment),
            TaskKind::Classification => self
                .provider
                .classify_text(text)
                .await
                .map(TaskOutput::Classification),
            TaskKind::Entity => self
                .provider
                .extract_entities(text)
                .await
                .map(|entities| TaskOutput::Entities(self.filter_entities(entities))),
        };

        match result {
            Ok(output) => TaskOutcome::Success { task: kind, output },
            Err(error) => TaskOutcome::Failure { task: kind, error },
        }
    }

    /// Applies the entity-type allow-set. An empty set keeps everything;
    /// otherwise non-listed types survive only when common entities are kept.
    fn filter_entities(
        &self,
        entities: BTreeMap<String, Vec<String>>,
    ) -> BTreeMap<String, Vec<String>> {
        if self.entity_types.is_empty() {
            return entities;
        }
        entities
            .into_iter()
            .filter(|(entity_type, _)| {
                self.entity_types.contains(entity_type) || self.save_common_entities
            })
            .collect()
    }
}
