// src/utils/prometheus_metrics.rs

use once_cell::sync::Lazy;
use prometheus::{register_counter, register_gauge, register_histogram, Counter, Gauge, Histogram};

pub static EVENTS_RECEIVED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "annotator_events_received_total",
        "Total number of change events received."
    )
    .expect("Failed to register EVENTS_RECEIVED_TOTAL counter")
});

pub static EVENTS_SKIPPED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "annotator_events_skipped_total",
        "Total number of change events skipped without annotation work."
    )
    .expect("Failed to register EVENTS_SKIPPED_TOTAL counter")
});

pub static ANNOTATIONS_WRITTEN_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "annotator_annotations_written_total",
        "Total number of merged annotation results written back to documents."
    )
    .expect("Failed to register ANNOTATIONS_WRITTEN_TOTAL counter")
});

pub static OUTPUT_DELETES_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "annotator_output_deletes_total",
        "Total number of output-field deletions issued to the document store."
    )
    .expect("Failed to register OUTPUT_DELETES_TOTAL counter")
});

pub static TASKS_DISPATCHED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "annotator_tasks_dispatched_total",
        "Total number of NLP tasks dispatched to the provider."
    )
    .expect("Failed to register TASKS_DISPATCHED_TOTAL counter")
});

pub static TASKS_FAILED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "annotator_tasks_failed_total",
        "Total number of NLP tasks that failed at the provider."
    )
    .expect("Failed to register TASKS_FAILED_TOTAL counter")
});

pub static UNKNOWN_TASKS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "annotator_unknown_tasks_total",
        "Total number of unrecognized task names skipped during dispatch."
    )
    .expect("Failed to register UNKNOWN_TASKS_TOTAL counter")
});

pub static WAREHOUSE_STATEMENTS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "annotator_warehouse_statements_total",
        "Total number of statements executed against the analytics warehouse."
    )
    .expect("Failed to register WAREHOUSE_STATEMENTS_TOTAL counter")
});

pub static WAREHOUSE_STATEMENT_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "annotator_warehouse_statement_errors_total",
        "Total number of warehouse statements that failed (best-effort, swallowed)."
    )
    .expect("Failed to register WAREHOUSE_STATEMENT_ERRORS_TOTAL counter")
});

pub static WAREHOUSE_BOOTSTRAP_FAILURES_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "annotator_warehouse_bootstrap_failures_total",
        "Total number of failed warehouse schema bootstrap attempts."
    )
    .expect("Failed to register WAREHOUSE_BOOTSTRAP_FAILURES_TOTAL counter")
});

pub static ACTIVE_EVENTS: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "annotator_active_events",
        "Number of change events currently being handled concurrently."
    )
    .expect("Failed to register ACTIVE_EVENTS gauge")
});

pub static EVENT_HANDLING_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "annotator_event_handling_duration_seconds",
        "Histogram of change-event handling durations (receipt to completion)."
    )
    .expect("Failed to register EVENT_HANDLING_DURATION_SECONDS histogram")
});
