// src/handler.rs
//
// Orchestration of one change-event invocation: classify, gate, dispatch,
// aggregate, then apply the document update and the warehouse mirror as
// independent side effects.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::HandlerConfig;
use crate::data_model::ChangeEvent;
use crate::error::Result;
use crate::pipeline::aggregator::aggregate;
use crate::pipeline::classifier::classify;
use crate::pipeline::dispatcher::TaskDispatcher;
use crate::pipeline::gate::{decide, Action, SkipReason};
use crate::provider::NlpProvider;
use crate::store::{DocumentWriter, FieldUpdate};
use crate::utils::common::split_doc_path;
use crate::utils::prometheus_metrics::*;
use crate::warehouse::WarehouseMirror;

/// Stateless per-event handler. The only cross-invocation state is the
/// mirror's bootstrap flag, owned by the shared `WarehouseMirror`.
pub struct AnnotationHandler {
    config: HandlerConfig,
    dispatcher: TaskDispatcher,
    store: Arc<dyn DocumentWriter>,
    mirror: Option<Arc<WarehouseMirror>>,
}

impl AnnotationHandler {
    pub fn new(
        config: HandlerConfig,
        provider: Arc<dyn NlpProvider>,
        store: Arc<dyn DocumentWriter>,
        mirror: Option<Arc<WarehouseMirror>>,
    ) -> Self {
        let dispatcher = TaskDispatcher::new(provider, &config);
        AnnotationHandler {
            config,
            dispatcher,
            store,
            mirror,
        }
    }

    /// Handles one delivered change event end to end.
    pub async fn handle_change(&self, event: ChangeEvent) -> Result<()> {
        EVENTS_RECEIVED_TOTAL.inc();
        ACTIVE_EVENTS.inc();
        let timer = EVENT_HANDLING_DURATION_SECONDS.start_timer();

        let change = classify(&event);
        let action = decide(change, &event.before, &event.after, &self.config);
        debug!(change = ?change, action = ?action, "Gate decision");

        let result = match action {
            Action::Skip(reason) => {
                EVENTS_SKIPPED_TOTAL.inc();
                self.handle_skip(&event, reason).await;
                Ok(())
            }
            Action::DeleteOutput => self.delete_annotations(&event).await,
            Action::Run(text) => self.annotate(&event, &text).await,
        };

        timer.observe_duration();
        ACTIVE_EVENTS.dec();
        result
    }

    async fn handle_skip(&self, event: &ChangeEvent, reason: SkipReason) {
        match reason {
            SkipReason::InvalidConfig(message) => {
                // Reported once per invocation; suppresses everything else,
                // including delete-mirroring.
                error!(
                    input_field = %self.config.input_field,
                    output_field = %self.config.output_field,
                    %message,
                    "Invalid field configuration. Ignoring event."
                );
            }
            SkipReason::DocumentDeleted => {
                // No NLP work and no document write, but mirrored rows follow
                // the document lifecycle.
                debug!(path = %event.before.path, "Document deleted. Purging mirrored rows.");
                let (collection_path, doc_id) = split_doc_path(&event.before.path);
                self.purge_mirror(collection_path, doc_id).await;
            }
            other => {
                debug!(reason = ?other, path = %event.after.path, "Skipping event");
            }
        }
    }

    /// Run path: dispatch the enabled tasks, merge the survivors, then write
    /// the document update and the warehouse rows as independent effects.
    async fn annotate(&self, event: &ChangeEvent, text: &str) -> Result<()> {
        let outcomes = self.dispatcher.dispatch(text, &self.config.tasks).await;
        let (result, failures) = aggregate(outcomes);

        for failure in &failures {
            TASKS_FAILED_TOTAL.inc();
            warn!(task = %failure.task, error = %failure.error, "Annotation task failed");
        }

        let doc_path = &event.after.path;
        let (collection_path, doc_id) = split_doc_path(doc_path);
        let merged = serde_json::to_value(&result)?;

        let update = self
            .store
            .update(doc_path, &self.config.output_field, FieldUpdate::Set(merged));
        let mirror = async {
            if let Some(mirror) = &self.mirror {
                if let Err(e) = mirror.write_nlp_data(&result, collection_path, doc_id).await {
                    error!(error = %e, "Warehouse mirror write failed");
                }
            }
        };
        let (update_result, ()) = tokio::join!(update, mirror);
        update_result?;

        ANNOTATIONS_WRITTEN_TOTAL.inc();
        Ok(())
    }

    /// DeleteOutput path: the input field was removed on update, so drop the
    /// output field and purge the mirrored rows.
    async fn delete_annotations(&self, event: &ChangeEvent) -> Result<()> {
        let doc_path = &event.after.path;
        let (collection_path, doc_id) = split_doc_path(doc_path);

        let update = self
            .store
            .update(doc_path, &self.config.output_field, FieldUpdate::Delete);
        let mirror = self.purge_mirror(collection_path, doc_id);
        let (update_result, ()) = tokio::join!(update, mirror);
        update_result?;

        OUTPUT_DELETES_TOTAL.inc();
        Ok(())
    }

    async fn purge_mirror(&self, collection_path: &str, doc_id: &str) {
        if let Some(mirror) = &self.mirror {
            if let Err(e) = mirror.delete_nlp_data(collection_path, doc_id).await {
                error!(error = %e, "Warehouse mirror purge failed");
            }
        }
    }
}
