// Utils

pub mod common;
pub mod prometheus_metrics;

pub use common::{is_dot_prefix, split_doc_path, value_at};
